use image::RgbaImage;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ElementId, ElementKind, RenderSurface, SurfaceElement};

/// In-memory render surface for hosts without a display, and for tests.
///
/// Elements are kept in insertion order.
pub struct HeadlessSurface {
    client_width: u32,
    client_height: u32,
    elements: RwLock<Vec<(ElementId, SurfaceElement)>>,
    next_id: AtomicU64,
    acquired: AtomicBool,
}

impl HeadlessSurface {
    pub fn new(client_width: u32, client_height: u32) -> Self {
        Self {
            client_width,
            client_height,
            elements: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            acquired: AtomicBool::new(false),
        }
    }

    pub fn element_count(&self) -> usize {
        self.read().len()
    }

    pub fn element_kinds(&self) -> Vec<ElementKind> {
        self.read()
            .iter()
            .map(|(_, element)| element.kind())
            .collect()
    }

    pub fn count_of(&self, kind: ElementKind) -> usize {
        self.read()
            .iter()
            .filter(|(_, element)| element.kind() == kind)
            .count()
    }

    /// Pixels of the canvas with the given element id, if it holds any.
    pub fn canvas_content(&self, canvas_id: &str) -> Option<RgbaImage> {
        self.read()
            .iter()
            .find_map(|(_, element)| match element {
                SurfaceElement::Canvas {
                    id,
                    content: Some(content),
                    ..
                } if *id == canvas_id => Some(content.clone()),
                _ => None,
            })
    }

    /// `(width, height)` of the canvas with the given element id.
    pub fn canvas_size(&self, canvas_id: &str) -> Option<(u32, u32)> {
        self.read()
            .iter()
            .find_map(|(_, element)| match element {
                SurfaceElement::Canvas {
                    id, width, height, ..
                } if *id == canvas_id => Some((*width, *height)),
                _ => None,
            })
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<(ElementId, SurfaceElement)>> {
        match self.elements.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<(ElementId, SurfaceElement)>> {
        match self.elements.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn client_size(&self) -> (u32, u32) {
        (self.client_width, self.client_height)
    }

    fn append(&self, element: SurfaceElement) -> ElementId {
        let id = ElementId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.write().push((id, element));
        id
    }

    fn remove(&self, id: ElementId) -> bool {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|(existing, _)| *existing != id);
        guard.len() != before
    }

    fn clear(&self) {
        self.write().clear();
    }

    fn try_acquire(&self) -> bool {
        self.acquired
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn release(&self) {
        self.acquired.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Region, ShadePosition, ShadeRect};

    fn canvas(id: &'static str) -> SurfaceElement {
        SurfaceElement::Canvas {
            id,
            width: 10,
            height: 10,
            visible: false,
            content: None,
        }
    }

    #[test]
    fn append_and_remove_track_elements() {
        let surface = HeadlessSurface::new(300, 300);
        let first = surface.append(canvas("a"));
        let second = surface.append(SurfaceElement::Shade(ShadeRect {
            position: ShadePosition::Left,
            rect: Region::new(0.0, 0.0, 10.0, 300.0),
        }));

        assert_eq!(surface.element_kinds(), [ElementKind::Canvas, ElementKind::Shade]);
        assert!(surface.remove(first));
        assert!(!surface.remove(first));
        assert_eq!(surface.element_count(), 1);
        assert!(surface.remove(second));
        assert_eq!(surface.element_count(), 0);
    }

    #[test]
    fn acquire_is_exclusive_until_released() {
        let surface = HeadlessSurface::new(0, 0);
        assert!(surface.try_acquire());
        assert!(!surface.try_acquire());
        surface.release();
        assert!(surface.try_acquire());
    }
}
