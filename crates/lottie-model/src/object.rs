//! Schema-driven objects and object-graph traversal.

use std::any::Any;

use lottie_core::LottieResult;

use crate::prop::Prop;
use crate::{Dict, Json};

/// A type whose wire form is described by a static prop table.
pub trait Schema: Default + 'static {
    /// Class name used in errors and node listings.
    const CLASS: &'static str;

    /// The prop table, in wire key order.
    fn props() -> &'static [Prop<Self>];

    /// Hook run after every prop has been loaded.
    fn after_load(&mut self, _dict: &Dict) -> LottieResult<()> {
        Ok(())
    }
}

/// Serializes every prop that has a value.
pub fn schema_to_dict<T: Schema>(obj: &T) -> LottieResult<Dict> {
    let mut dict = Dict::new();
    for prop in T::props() {
        if let Some(value) = prop.to_json(obj)? {
            dict.insert(prop.lottie.to_string(), value);
        }
    }
    Ok(dict)
}

/// Builds a default object and loads every prop into it.
pub fn schema_load<T: Schema>(dict: &Dict) -> LottieResult<T> {
    let mut obj = T::default();
    for prop in T::props() {
        prop.load_into(dict, &mut obj)?;
    }
    obj.after_load(dict)?;
    Ok(obj)
}

/// Value of the prop named `name` (the Rust-side name, not the wire key).
pub fn schema_property<T: Schema>(obj: &T, name: &str) -> Option<Json> {
    T::props()
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.to_json(obj).ok().flatten())
}

pub fn schema_children<T: Schema>(obj: &T) -> Vec<&dyn Node> {
    T::props().iter().flat_map(|p| p.children(obj)).collect()
}

/// A node of the object graph.
pub trait Node: Any {
    fn class_name(&self) -> &'static str;

    /// Serialized value of a named property.
    fn property(&self, name: &str) -> Option<Json>;

    /// Directly owned child objects, in prop order.
    fn children(&self) -> Vec<&dyn Node>;

    fn as_any(&self) -> &dyn Any;
}

impl<'n> dyn Node + 'n {
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// An object that round-trips through a wire dictionary.
pub trait LottieObject: Node + Sized {
    fn to_dict(&self) -> LottieResult<Dict>;

    fn load(dict: &Dict) -> LottieResult<Self>;

    /// First node, depth first, whose `name` equals `search`.
    fn find(&self, search: &str) -> Option<&dyn Node> {
        find_node(self, "name", &Json::from(search))
    }

    /// First node, depth first, whose property `name` equals `value`.
    fn find_by(&self, name: &str, value: &Json) -> Option<&dyn Node> {
        find_node(self, name, value)
    }

    /// Every node whose property `name` equals `value`.
    fn find_all(&self, name: &str, value: &Json) -> Vec<&dyn Node> {
        let mut found = Vec::new();
        walk(self, &mut |node| {
            if node.property(name).as_ref() == Some(value) {
                found.push(node);
            }
        });
        found
    }

    /// First node of type `T` named `search`.
    fn find_as<T: Node>(&self, search: &str) -> Option<&T> {
        self.find_all("name", &Json::from(search))
            .into_iter()
            .find_map(|node| node.downcast_ref::<T>())
    }
}

/// Depth-first search of the graph rooted at `node`.
pub fn find_node<'a>(node: &'a dyn Node, name: &str, value: &Json) -> Option<&'a dyn Node> {
    if node.property(name).as_ref() == Some(value) {
        return Some(node);
    }
    node.children()
        .into_iter()
        .find_map(|child| find_node(child, name, value))
}

/// Visits `node` and then its descendants, depth first.
pub fn walk<'a>(node: &'a dyn Node, visit: &mut dyn FnMut(&'a dyn Node)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}

/// Implements [`Node`], [`LottieValue`](crate::values::LottieValue) and
/// [`LottieObject`] for types implementing [`Schema`].
#[macro_export]
macro_rules! schema_object {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::object::Node for $ty {
            fn class_name(&self) -> &'static str {
                <$ty as $crate::object::Schema>::CLASS
            }

            fn property(&self, name: &str) -> Option<$crate::Json> {
                $crate::object::schema_property(self, name)
            }

            fn children(&self) -> Vec<&dyn $crate::object::Node> {
                $crate::object::schema_children(self)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl $crate::values::LottieValue for $ty {
            const TYPE_NAME: &'static str = <$ty as $crate::object::Schema>::CLASS;

            fn to_json(&self) -> $crate::LottieResult<$crate::Json> {
                $crate::object::schema_to_dict(self).map($crate::Json::Object)
            }

            fn from_json(value: &$crate::Json) -> $crate::LottieResult<Self> {
                $crate::object::schema_load($crate::values::expect_object(value)?)
            }

            fn as_node(&self) -> Option<&dyn $crate::object::Node> {
                Some(self)
            }
        }

        impl $crate::object::LottieObject for $ty {
            fn to_dict(&self) -> $crate::LottieResult<$crate::Dict> {
                $crate::object::schema_to_dict(self)
            }

            fn load(dict: &$crate::Dict) -> $crate::LottieResult<Self> {
                $crate::object::schema_load(dict)
            }
        }
    )+};
}
