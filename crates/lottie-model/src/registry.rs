//! Extension registry for application defined shapes.
//!
//! A shape dictionary carrying the [`EXTENSION_KEY`] names the extension that
//! produced it. The extension must be registered before the document is
//! loaded; documents naming an unknown extension are rejected.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use lottie_core::{LottieError, LottieResult};
use parking_lot::RwLock;
use tracing::debug;

use crate::object::{LottieObject, Node};
use crate::shapes::ShapeElement;
use crate::values::{json_kind, LottieValue};
use crate::{Dict, Json};

/// Wire key holding the extension id of a custom shape.
pub const EXTENSION_KEY: &str = "__pyclass";

/// Builds plain shapes out of extension specific properties.
pub trait Extension: Send + Sync {
    /// Unique id written under [`EXTENSION_KEY`].
    fn id(&self) -> &str;

    /// Wire keys owned by the extension rather than by the built shape.
    fn property_keys(&self) -> &[&'static str] {
        &[]
    }

    fn build(&self, properties: &Dict) -> LottieResult<ShapeElement>;
}

/// Registered extensions by id.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: HashMap<String, Arc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension, returning the one it replaces.
    pub fn register(&mut self, extension: Arc<dyn Extension>) -> Option<Arc<dyn Extension>> {
        let id = extension.id().to_string();
        debug!(extension = %id, "registering extension");
        self.extensions.insert(id, extension)
    }

    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn Extension>> {
        self.extensions.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Extension>> {
        self.extensions.get(id).cloned()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.extensions.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn global() -> &'static RwLock<ExtensionRegistry> {
    static REGISTRY: OnceLock<RwLock<ExtensionRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(ExtensionRegistry::new()))
}

/// Registers `extension` process wide.
pub fn register_extension(extension: impl Extension + 'static) -> Option<Arc<dyn Extension>> {
    global().write().register(Arc::new(extension))
}

pub fn unregister_extension(id: &str) -> bool {
    global().write().unregister(id).is_some()
}

pub fn extension(id: &str) -> Option<Arc<dyn Extension>> {
    global().read().get(id)
}

pub fn registered_extensions() -> Vec<String> {
    global().read().ids()
}

fn lookup(id: &str) -> LottieResult<Arc<dyn Extension>> {
    extension(id).ok_or_else(|| LottieError::UnknownExtension(id.to_string()))
}

/// A shape produced by an extension.
///
/// `wrapped` is what players see; `properties` are kept so the extension can
/// rebuild it after they change.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomShape {
    pub extension: String,
    pub properties: Dict,
    pub wrapped: Box<ShapeElement>,
}

impl CustomShape {
    pub fn new(extension: &str, properties: Dict) -> LottieResult<Self> {
        let wrapped = lookup(extension)?.build(&properties)?;
        Ok(Self {
            extension: extension.to_string(),
            properties,
            wrapped: Box::new(wrapped),
        })
    }

    /// Rebuilds the wrapped shape from the current properties.
    pub fn refresh(&mut self) -> LottieResult<()> {
        *self.wrapped = lookup(&self.extension)?.build(&self.properties)?;
        Ok(())
    }
}

impl Node for CustomShape {
    fn class_name(&self) -> &'static str {
        "CustomShape"
    }

    fn property(&self, name: &str) -> Option<Json> {
        if name == "extension" {
            return Some(Json::from(self.extension.as_str()));
        }
        self.properties
            .get(name)
            .cloned()
            .or_else(|| self.wrapped.property(name))
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.wrapped.as_node().into_iter().collect()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl LottieObject for CustomShape {
    fn to_dict(&self) -> LottieResult<Dict> {
        let mut dict = self.wrapped.to_dict()?;
        dict.insert(EXTENSION_KEY.to_string(), Json::from(self.extension.as_str()));
        for (key, value) in &self.properties {
            dict.insert(key.clone(), value.clone());
        }
        Ok(dict)
    }

    /// Splits the dictionary between the extension properties and the
    /// wrapped shape. A dictionary without a shape `ty` is rebuilt by the
    /// extension.
    fn load(dict: &Dict) -> LottieResult<Self> {
        let id = match dict.get(EXTENSION_KEY) {
            Some(Json::String(id)) => id.as_str(),
            Some(other) => return Err(LottieError::unexpected("string", json_kind(other))),
            None => {
                return Err(LottieError::MissingDiscriminator {
                    kind: "custom shape".into(),
                    key: EXTENSION_KEY.into(),
                })
            }
        };
        let extension = lookup(id)?;
        debug!(extension = id, "loading custom shape");

        let keys = extension.property_keys();
        let mut properties = Dict::new();
        let mut rest = Dict::new();
        for (key, value) in dict {
            if key == EXTENSION_KEY {
                continue;
            }
            if keys.contains(&key.as_str()) {
                properties.insert(key.clone(), value.clone());
            } else {
                rest.insert(key.clone(), value.clone());
            }
        }

        let wrapped = if rest.contains_key("ty") {
            ShapeElement::load(&rest)?
        } else {
            extension.build(&properties)?
        };
        Ok(Self {
            extension: id.to_string(),
            properties,
            wrapped: Box::new(wrapped),
        })
    }
}
