//! Layer stacks shared by animations and precomps.

use lottie_core::{LottieError, LottieResult};

use crate::layers::Layer;

/// An ordered stack of layers. Layers earlier in the list draw on top.
///
/// Layers refer to each other by `index`; parenting is by the child's
/// `parent_index`.
pub trait Composition {
    fn layers(&self) -> &[Layer];
    fn layers_mut(&mut self) -> &mut Vec<Layer>;

    /// Fills in what a new layer inherits from the composition.
    fn prepare_layer(&self, _layer: &mut Layer) {}

    /// One more than the highest layer index in use.
    fn next_index(&self) -> i64 {
        self.layers()
            .iter()
            .filter_map(Layer::index)
            .max()
            .map_or(0, |max| max + 1)
    }

    fn add_layer(&mut self, layer: impl Into<Layer>) -> &mut Layer
    where
        Self: Sized,
    {
        let index = self.layers().len();
        self.insert_layer(index, layer)
    }

    /// Inserts a layer at position `position`, giving it an index when it
    /// has none.
    fn insert_layer(&mut self, position: usize, layer: impl Into<Layer>) -> &mut Layer
    where
        Self: Sized,
    {
        let mut layer = layer.into();
        if layer.index().is_none() {
            layer.base_mut().index = Some(self.next_index());
        }
        self.prepare_layer(&mut layer);
        let position = position.min(self.layers().len());
        let layers = self.layers_mut();
        layers.insert(position, layer);
        &mut layers[position]
    }

    fn layer(&self, index: i64) -> LottieResult<&Layer> {
        self.layers()
            .iter()
            .find(|layer| layer.index() == Some(index))
            .ok_or(LottieError::LayerNotFound(index))
    }

    fn layer_mut(&mut self, index: i64) -> LottieResult<&mut Layer> {
        self.layers_mut()
            .iter_mut()
            .find(|layer| layer.index() == Some(index))
            .ok_or(LottieError::LayerNotFound(index))
    }

    /// Adds `layer` as a child of the layer with index `parent`. The child
    /// inherits the parent's in and out points when it has none.
    fn add_child(&mut self, parent: i64, layer: impl Into<Layer>) -> LottieResult<&mut Layer>
    where
        Self: Sized,
    {
        let (in_point, out_point) = {
            let parent = self.layer(parent)?.base();
            (parent.in_point, parent.out_point)
        };
        let mut layer = layer.into();
        let base = layer.base_mut();
        base.in_point = base.in_point.or(in_point);
        base.out_point = base.out_point.or(out_point);
        base.parent_index = Some(parent);
        Ok(self.add_layer(layer))
    }

    fn children_of(&self, index: i64) -> Vec<&Layer> {
        self.layers()
            .iter()
            .filter(|layer| layer.parent_index() == Some(index))
            .collect()
    }

    /// Removes a layer and, recursively, its children. Returns the removed
    /// layers, the requested one first.
    fn remove_layer(&mut self, index: i64) -> LottieResult<Vec<Layer>> {
        let position = self
            .layers()
            .iter()
            .position(|layer| layer.index() == Some(index))
            .ok_or(LottieError::LayerNotFound(index))?;
        let mut removed = vec![self.layers_mut().remove(position)];
        let children: Vec<i64> = self
            .children_of(index)
            .into_iter()
            .filter_map(Layer::index)
            .filter(|child| *child != index)
            .collect();
        for child in children {
            // A child reachable twice is already gone.
            if let Ok(mut layers) = self.remove_layer(child) {
                removed.append(&mut layers);
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{NullLayer, ShapeLayer};

    #[derive(Default)]
    struct Stack {
        layers: Vec<Layer>,
    }

    impl Composition for Stack {
        fn layers(&self) -> &[Layer] {
            &self.layers
        }

        fn layers_mut(&mut self) -> &mut Vec<Layer> {
            &mut self.layers
        }
    }

    #[test]
    fn test_indices_are_assigned_in_order() {
        let mut stack = Stack::default();
        stack.add_layer(NullLayer::default());
        stack.add_layer(ShapeLayer::new());
        let indices: Vec<_> = stack.layers.iter().map(Layer::index).collect();
        assert_eq!(indices, vec![Some(0), Some(1)]);

        let mut explicit = NullLayer::default();
        explicit.base.index = Some(10);
        stack.insert_layer(0, explicit);
        assert_eq!(stack.add_layer(NullLayer::default()).index(), Some(11));
        assert_eq!(stack.layers[0].index(), Some(10));
    }

    #[test]
    fn test_layer_lookup() {
        let mut stack = Stack::default();
        stack.add_layer(NullLayer::default());
        assert!(stack.layer(0).is_ok());
        assert!(matches!(stack.layer(7), Err(LottieError::LayerNotFound(7))));
    }

    #[test]
    fn test_add_child_inherits_timing() {
        let mut stack = Stack::default();
        let mut parent = NullLayer::default();
        parent.base.in_point = Some(5.0);
        parent.base.out_point = Some(25.0);
        stack.add_layer(parent);
        let child = stack.add_child(0, ShapeLayer::new()).unwrap();
        assert_eq!(child.parent_index(), Some(0));
        assert_eq!(child.base().in_point, Some(5.0));
        assert_eq!(child.base().out_point, Some(25.0));
        assert_eq!(stack.children_of(0).len(), 1);
        assert!(stack.add_child(9, NullLayer::default()).is_err());
    }

    #[test]
    fn test_remove_layer_removes_descendants() {
        let mut stack = Stack::default();
        stack.add_layer(NullLayer::default());
        stack.add_child(0, NullLayer::default()).unwrap();
        stack.add_child(1, ShapeLayer::new()).unwrap();
        stack.add_layer(ShapeLayer::new());

        let removed = stack.remove_layer(0).unwrap();
        let removed: Vec<_> = removed.iter().map(Layer::index).collect();
        assert_eq!(removed, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(stack.layers.len(), 1);
        assert_eq!(stack.layers[0].index(), Some(3));
        assert!(stack.remove_layer(0).is_err());
    }
}
