//! Property descriptors.
//!
//! A [`Prop`] maps one field of a model type to one wire key. Each model type
//! lists its props in a static table; serialization walks the table in order,
//! so the key order of the produced dictionary is the declaration order.

use lottie_core::{LottieError, LottieResult};

use crate::object::Node;
use crate::values::{json_kind, Converter, LottieValue};
use crate::{Dict, Json};

/// How a field is wrapped on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The value as is.
    Scalar,
    /// An array of values.
    List,
    /// A single value wrapped in a one-element array.
    PseudoList,
}

/// Predicate on the raw wire dictionary deciding whether a prop is loaded.
pub type Condition = fn(&Dict) -> bool;

type StoreFn<O> = Box<dyn Fn(&O) -> Option<LottieResult<Json>> + Send + Sync>;
type LoadFn<O> = Box<dyn Fn(&mut O, Option<&Json>) -> LottieResult<()> + Send + Sync>;
type ChildrenFn<O> = Box<dyn for<'a> Fn(&'a O) -> Vec<&'a dyn Node> + Send + Sync>;

/// Descriptor for one property of `O`.
pub struct Prop<O> {
    /// Rust-side field name, used by searches.
    pub name: &'static str,
    /// Wire key.
    pub lottie: &'static str,
    pub type_name: &'static str,
    pub cardinality: Cardinality,
    cond: Option<Condition>,
    store: StoreFn<O>,
    load: Option<LoadFn<O>>,
    children: Option<ChildrenFn<O>>,
}

impl<O> std::fmt::Debug for Prop<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Prop {}:{}>", self.name, self.lottie)
    }
}

fn children_fn<O, F>(f: F) -> ChildrenFn<O>
where
    F: for<'a> Fn(&'a O) -> Vec<&'a dyn Node> + Send + Sync + 'static,
{
    Box::new(f)
}

fn encode<T: LottieValue>(cardinality: Cardinality, value: &T) -> LottieResult<Json> {
    let json = value.to_json()?;
    Ok(match cardinality {
        Cardinality::PseudoList => Json::Array(vec![json]),
        _ => json,
    })
}

fn decode<T: LottieValue>(cardinality: Cardinality, json: &Json) -> LottieResult<Option<T>> {
    match (cardinality, json) {
        (_, Json::Null) => Ok(None),
        (Cardinality::PseudoList, Json::Array(items)) => match items.first() {
            None | Some(Json::Null) => Ok(None),
            Some(first) => T::from_json(first).map(Some),
        },
        _ => T::from_json(json).map(Some),
    }
}

fn decode_list<T: LottieValue>(json: &Json) -> LottieResult<Vec<T>> {
    match json {
        Json::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(T::from_json)
            .collect(),
        other => Err(LottieError::unexpected("array", json_kind(other))),
    }
}

fn encode_list<T: LottieValue>(items: &[T]) -> LottieResult<Json> {
    items
        .iter()
        .map(T::to_json)
        .collect::<LottieResult<Vec<_>>>()
        .map(Json::Array)
}

impl<O: 'static> Prop<O> {
    fn build(
        name: &'static str,
        lottie: &'static str,
        type_name: &'static str,
        cardinality: Cardinality,
        store: StoreFn<O>,
        load: Option<LoadFn<O>>,
        children: Option<ChildrenFn<O>>,
    ) -> Self {
        Self {
            name,
            lottie,
            type_name,
            cardinality,
            cond: None,
            store,
            load,
            children,
        }
    }

    /// An optional field; `None` is omitted from the output.
    pub fn scalar<T, G, M>(name: &'static str, lottie: &'static str, get: G, get_mut: M) -> Self
    where
        T: LottieValue + 'static,
        G: Fn(&O) -> &Option<T> + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut Option<T> + Send + Sync + 'static,
    {
        Self::optional(name, lottie, Cardinality::Scalar, get, get_mut)
    }

    /// An optional field written as a one-element array.
    pub fn pseudo_list<T, G, M>(
        name: &'static str,
        lottie: &'static str,
        get: G,
        get_mut: M,
    ) -> Self
    where
        T: LottieValue + 'static,
        G: Fn(&O) -> &Option<T> + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut Option<T> + Send + Sync + 'static,
    {
        Self::optional(name, lottie, Cardinality::PseudoList, get, get_mut)
    }

    fn optional<T, G, M>(
        name: &'static str,
        lottie: &'static str,
        cardinality: Cardinality,
        get: G,
        get_mut: M,
    ) -> Self
    where
        T: LottieValue + 'static,
        G: Fn(&O) -> &Option<T> + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut Option<T> + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            T::TYPE_NAME,
            cardinality,
            Box::new(move |o: &O| get(o).as_ref().map(|v| encode(cardinality, v))),
            Some(Box::new(move |o: &mut O, json: Option<&Json>| {
                *get_mut(o) = match json {
                    Some(json) => decode(cardinality, json)?,
                    None => None,
                };
                Ok(())
            })),
            Some(children_fn(move |o: &O| {
                get(o).as_ref().and_then(|v| v.as_node()).into_iter().collect()
            })),
        )
    }

    /// A field that always has a value. A missing key keeps the current one.
    pub fn required<T, G, M>(
        name: &'static str,
        lottie: &'static str,
        cardinality: Cardinality,
        get: G,
        get_mut: M,
    ) -> Self
    where
        T: LottieValue + 'static,
        G: Fn(&O) -> &T + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut T + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            T::TYPE_NAME,
            cardinality,
            Box::new(move |o: &O| Some(encode(cardinality, get(o)))),
            Some(Box::new(move |o: &mut O, json: Option<&Json>| {
                if let Some(value) = json.map(|j| decode(cardinality, j)).transpose()?.flatten() {
                    *get_mut(o) = value;
                }
                Ok(())
            })),
            Some(children_fn(move |o: &O| get(o).as_node().into_iter().collect())),
        )
    }

    /// An optional array of values. Null entries are skipped on load.
    pub fn list<T, G, M>(name: &'static str, lottie: &'static str, get: G, get_mut: M) -> Self
    where
        T: LottieValue + 'static,
        G: Fn(&O) -> &Option<Vec<T>> + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut Option<Vec<T>> + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            T::TYPE_NAME,
            Cardinality::List,
            Box::new(move |o: &O| get(o).as_ref().map(|items| encode_list(items))),
            Some(Box::new(move |o: &mut O, json: Option<&Json>| {
                *get_mut(o) = match json {
                    None | Some(Json::Null) => None,
                    Some(json) => Some(decode_list(json)?),
                };
                Ok(())
            })),
            Some(children_fn(move |o: &O| {
                get(o)
                    .iter()
                    .flatten()
                    .filter_map(|v| v.as_node())
                    .collect()
            })),
        )
    }

    /// An array that is always written, even when empty.
    pub fn items<T, G, M>(name: &'static str, lottie: &'static str, get: G, get_mut: M) -> Self
    where
        T: LottieValue + 'static,
        G: Fn(&O) -> &Vec<T> + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut Vec<T> + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            T::TYPE_NAME,
            Cardinality::List,
            Box::new(move |o: &O| Some(encode_list(get(o)))),
            Some(Box::new(move |o: &mut O, json: Option<&Json>| {
                match json {
                    None | Some(Json::Null) => {}
                    Some(json) => *get_mut(o) = decode_list(json)?,
                }
                Ok(())
            })),
            Some(children_fn(move |o: &O| {
                get(o).iter().filter_map(|v| v.as_node()).collect()
            })),
        )
    }

    /// An optional field with a custom wire encoding.
    pub fn converted<C, G, M>(name: &'static str, lottie: &'static str, get: G, get_mut: M) -> Self
    where
        C: Converter + 'static,
        C::Value: 'static,
        G: Fn(&O) -> &Option<C::Value> + Copy + Send + Sync + 'static,
        M: Fn(&mut O) -> &mut Option<C::Value> + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            C::NAME,
            Cardinality::Scalar,
            Box::new(move |o: &O| get(o).as_ref().map(|v| Ok(C::to_lottie(v)))),
            Some(Box::new(move |o: &mut O, json: Option<&Json>| {
                *get_mut(o) = match json {
                    None | Some(Json::Null) => None,
                    Some(json) => Some(C::from_lottie(json)?),
                };
                Ok(())
            })),
            None,
        )
    }

    /// A read-only prop derived from other fields. It is written but never loaded.
    pub fn computed<F>(
        name: &'static str,
        lottie: &'static str,
        type_name: &'static str,
        compute: F,
    ) -> Self
    where
        F: Fn(&O) -> Option<Json> + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            type_name,
            Cardinality::Scalar,
            Box::new(move |o: &O| compute(o).map(Ok)),
            None,
            None,
        )
    }

    /// A prop with hand-written store and load functions.
    pub fn custom<S, L>(
        name: &'static str,
        lottie: &'static str,
        type_name: &'static str,
        cardinality: Cardinality,
        store: S,
        load: L,
    ) -> Self
    where
        S: Fn(&O) -> Option<LottieResult<Json>> + Send + Sync + 'static,
        L: Fn(&mut O, Option<&Json>) -> LottieResult<()> + Send + Sync + 'static,
    {
        Self::build(
            name,
            lottie,
            type_name,
            cardinality,
            Box::new(store),
            Some(Box::new(load)),
            None,
        )
    }

    /// Only load this prop when `cond` holds for the wire dictionary.
    pub fn when(mut self, cond: Condition) -> Self {
        self.cond = Some(cond);
        self
    }

    /// Child nodes reachable through this prop, for custom props.
    pub fn with_children<F>(mut self, children: F) -> Self
    where
        F: for<'a> Fn(&'a O) -> Vec<&'a dyn Node> + Send + Sync + 'static,
    {
        self.children = Some(children_fn(children));
        self
    }
}

impl<O> Prop<O> {
    pub fn is_computed(&self) -> bool {
        self.load.is_none()
    }

    /// Serializes the prop's value, `None` when it is unset.
    pub fn to_json(&self, obj: &O) -> LottieResult<Option<Json>> {
        (self.store)(obj)
            .transpose()
            .map_err(|e| self.wrap(e))
    }

    /// Loads the prop from the dictionary of the object it belongs to.
    pub fn load_into(&self, dict: &Dict, obj: &mut O) -> LottieResult<()> {
        if let Some(cond) = self.cond {
            if !cond(dict) {
                return Ok(());
            }
        }
        match &self.load {
            Some(load) => load(obj, dict.get(self.lottie)).map_err(|e| self.wrap(e)),
            None => Ok(()),
        }
    }

    pub fn children<'a>(&self, obj: &'a O) -> Vec<&'a dyn Node> {
        match &self.children {
            Some(children) => children(obj),
            None => Vec::new(),
        }
    }

    fn wrap(&self, source: LottieError) -> LottieError {
        LottieError::property(self.lottie, self.name, self.type_name, source)
    }
}

/// [`Prop::scalar`] over an `Option` field reached by a field path.
macro_rules! scalar_field {
    ($ty:ty, $name:literal, $lottie:literal, $($field:ident).+) => {
        $crate::prop::Prop::scalar(
            $name,
            $lottie,
            |o: &$ty| &o.$($field).+,
            |o: &mut $ty| &mut o.$($field).+,
        )
    };
}

pub(crate) use scalar_field;
