//! Per-kind shape storage
//!
//! Colliders refer to their geometry by `(ShapeKind, index)`. Each kind has
//! its own store; freed indices are reused by the next insert.

use crate::error::{PhysicsError, Result, StoreKind};
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Polygon, Rectangle, Shape, ShapeKind};
use crate::storage::allocator::SharedAllocator;
use crate::storage::slot_arena::SlotArena;

/// Store for one kind of shape, addressed by plain index.
pub struct ShapeStore<S> {
    kind: ShapeKind,
    slots: SlotArena<Option<S>>,
}

impl<S> ShapeStore<S> {
    pub fn new(kind: ShapeKind, allocator: SharedAllocator, growth_factor: f32) -> Self {
        Self {
            kind,
            slots: SlotArena::new(StoreKind::Shape(kind), allocator, growth_factor),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Stores `shape` and returns its index.
    pub fn insert(&mut self, shape: S) -> Result<usize> {
        Ok(self.slots.create(Some(shape))?.index())
    }

    /// Frees the slot at `index`, returning the shape it held.
    pub fn remove(&mut self, index: usize) -> Result<S> {
        let handle = self.slots.handle_at(index).ok_or_else(|| self.missing(index))?;
        // An emptied slot is free for the next insert
        self.slots
            .get_mut(handle)?
            .take()
            .ok_or_else(|| self.missing(index))
    }

    pub fn get(&self, index: usize) -> Result<&S> {
        let handle = self.slots.handle_at(index).ok_or_else(|| self.missing(index))?;
        self.slots
            .get(handle)?
            .as_ref()
            .ok_or_else(|| self.missing(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut S> {
        let missing = self.missing(index);
        let handle = self.slots.handle_at(index).ok_or(missing.clone())?;
        self.slots.get_mut(handle)?.as_mut().ok_or(missing)
    }

    /// Number of stored shapes.
    pub fn len(&self) -> usize {
        self.slots.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn missing(&self, index: usize) -> PhysicsError {
        let kind = StoreKind::Shape(self.kind);
        match self.slots.generation(index) {
            Some(current) => PhysicsError::StaleReference {
                kind,
                index,
                generation: current,
                current,
            },
            None => PhysicsError::IndexOutOfRange {
                kind,
                index,
                len: self.slots.capacity(),
            },
        }
    }
}

/// The three shape stores of a world.
pub struct ShapeStores {
    pub circles: ShapeStore<Circle>,
    pub rectangles: ShapeStore<Rectangle>,
    pub polygons: ShapeStore<Polygon>,
}

impl ShapeStores {
    pub fn new(allocator: SharedAllocator, growth_factor: f32) -> Self {
        Self {
            circles: ShapeStore::new(ShapeKind::Circle, allocator.clone(), growth_factor),
            rectangles: ShapeStore::new(ShapeKind::Rectangle, allocator.clone(), growth_factor),
            polygons: ShapeStore::new(ShapeKind::Polygon, allocator, growth_factor),
        }
    }

    /// Stores `shape` in the store of its kind. `Shape::None` is rejected.
    pub fn insert(&mut self, shape: Shape) -> Result<(ShapeKind, usize)> {
        let kind = shape.kind();
        let index = match shape {
            Shape::None => {
                return Err(PhysicsError::InvalidShape(
                    "a collider needs a circle, rectangle or polygon".into(),
                ))
            }
            Shape::Circle(c) => self.circles.insert(c)?,
            Shape::Rectangle(r) => self.rectangles.insert(r)?,
            Shape::Polygon(p) => self.polygons.insert(p)?,
        };
        Ok((kind, index))
    }

    pub fn remove(&mut self, kind: ShapeKind, index: usize) -> Result<()> {
        match kind {
            ShapeKind::None => Ok(()),
            ShapeKind::Circle => self.circles.remove(index).map(drop),
            ShapeKind::Rectangle => self.rectangles.remove(index).map(drop),
            ShapeKind::Polygon => self.polygons.remove(index).map(drop),
        }
    }

    /// The shape at `(kind, index)`, moved by `offset` into world space.
    pub fn world_shape(&self, kind: ShapeKind, index: usize, offset: Vec2) -> Result<Shape> {
        Ok(match kind {
            ShapeKind::None => Shape::None,
            ShapeKind::Circle => Shape::Circle(self.circles.get(index)?.translated(offset)),
            ShapeKind::Rectangle => {
                Shape::Rectangle(self.rectangles.get(index)?.translated(offset))
            }
            ShapeKind::Polygon => Shape::Polygon(self.polygons.get(index)?.translated(offset)),
        })
    }

    pub fn clear(&mut self) {
        self.circles.clear();
        self.rectangles.clear();
        self.polygons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::allocator::HeapAllocator;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stores() -> ShapeStores {
        ShapeStores::new(Rc::new(RefCell::new(HeapAllocator::new())), 2.0)
    }

    #[test]
    fn test_insert_and_reuse_index() {
        let mut stores = stores();
        let (kind, a) = stores.insert(Circle::with_radius(1.0).unwrap().into()).unwrap();
        let (_, b) = stores.insert(Circle::with_radius(2.0).unwrap().into()).unwrap();
        assert_eq!(kind, ShapeKind::Circle);
        assert_eq!((a, b), (0, 1));

        stores.remove(ShapeKind::Circle, a).unwrap();
        assert!(stores.circles.get(a).is_err());
        assert_eq!(stores.circles.len(), 1);

        let (_, c) = stores.insert(Circle::with_radius(3.0).unwrap().into()).unwrap();
        assert_eq!(c, a);
        assert_eq!(stores.circles.get(c).unwrap().radius, 3.0);
    }

    #[test]
    fn test_kinds_are_indexed_separately() {
        let mut stores = stores();
        let (_, c) = stores.insert(Circle::default().into()).unwrap();
        let (_, r) = stores.insert(Rectangle::default().into()).unwrap();
        assert_eq!((c, r), (0, 0));
        assert!(stores.polygons.get(0).is_err());
    }

    #[test]
    fn test_none_shape_rejected() {
        let mut stores = stores();
        assert!(matches!(
            stores.insert(Shape::None),
            Err(PhysicsError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_world_shape_applies_offset() {
        let mut stores = stores();
        let rect = Rectangle::new(Vec2::new(1.0, 0.0), Vec2::new(0.5, 0.5)).unwrap();
        let (kind, index) = stores.insert(rect.into()).unwrap();
        let shape = stores.world_shape(kind, index, Vec2::new(2.0, 3.0)).unwrap();
        match shape {
            Shape::Rectangle(r) => assert_eq!(r.center, Vec2::new(3.0, 3.0)),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut stores = stores();
        let (_, i) = stores.insert(Circle::default().into()).unwrap();
        stores.circles.get_mut(i).unwrap().radius = 4.0;
        assert_eq!(stores.circles.get(i).unwrap().radius, 4.0);
    }
}
