//! Type descriptors and overload identity.
//!
//! A [`TypeDescriptor`] names the static type of one parameter. A method is
//! identified on the wire by its name plus the ordered descriptors of its
//! parameters ([`MethodSignature`]), so `add(i32, i32)` and `add(string, string)`
//! are distinct overloads even though both are called `add`.
//!
//! Descriptors always come from declared types (the [`Arguments`] tuple of a
//! stub or of an exposed method), never from runtime values.

use crate::encoding::{decode_value, encode_value};
use crate::{LpfcpError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Stable, opaque name of a parameter's static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(Cow<'static, str>);

impl TypeDescriptor {
    /// Descriptor backed by a static name.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Descriptor built at runtime (used for composite types).
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeDescriptor {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// Types that can appear in an exposed method's parameter list.
pub trait Describe {
    fn descriptor() -> TypeDescriptor;
}

/// Register a descriptor for one or more types.
///
/// ```
/// struct Point { x: i32, y: i32 }
///
/// lpfcp::describe!(Point => "geometry.Point");
///
/// use lpfcp::Describe;
/// assert_eq!(Point::descriptor().as_str(), "geometry.Point");
/// ```
#[macro_export]
macro_rules! describe {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl $crate::Describe for $ty {
                fn descriptor() -> $crate::TypeDescriptor {
                    $crate::TypeDescriptor::from_static($name)
                }
            }
        )+
    };
}

describe!(
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "string",
    () => "unit",
    Value => "json",
);

impl<T: Describe> Describe for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(format!("option<{}>", T::descriptor()))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(format!("list<{}>", T::descriptor()))
    }
}

impl<V: Describe, S> Describe for HashMap<String, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(format!("map<string,{}>", V::descriptor()))
    }
}

impl<V: Describe> Describe for BTreeMap<String, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(format!("map<string,{}>", V::descriptor()))
    }
}

/// An ordered parameter list: a tuple of describable, serializable values.
pub trait Arguments: Sized {
    /// Descriptors of the declared parameter types, in call order.
    fn descriptors() -> Vec<TypeDescriptor>;

    /// Encode the values in call order.
    fn encode(&self) -> Result<Vec<Value>>;

    /// Decode values received on the wire. The count must match the arity exactly.
    fn decode(values: Vec<Value>) -> Result<Self>;
}

impl Arguments for () {
    fn descriptors() -> Vec<TypeDescriptor> {
        Vec::new()
    }

    fn encode(&self) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }

    fn decode(values: Vec<Value>) -> Result<Self> {
        check_arity(&values, 0)
    }
}

fn check_arity(values: &[Value], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(LpfcpError::malformed_request(format!(
            "expected {} argument(s), got {}",
            expected,
            values.len()
        )));
    }
    Ok(())
}

fn decode_argument<T: DeserializeOwned>(
    values: &mut std::vec::IntoIter<Value>,
    index: usize,
) -> Result<T> {
    let value = values
        .next()
        .ok_or_else(|| LpfcpError::malformed_request(format!("missing argument #{}", index)))?;
    decode_value(value).map_err(|e| {
        LpfcpError::malformed_request(format!("argument #{} could not be decoded: {}", index, e))
    })
}

macro_rules! impl_arguments {
    ($arity:literal; $($name:ident : $idx:tt),+) => {
        impl<$($name),+> Arguments for ($($name,)+)
        where
            $($name: Describe + Serialize + DeserializeOwned),+
        {
            fn descriptors() -> Vec<TypeDescriptor> {
                vec![$($name::descriptor()),+]
            }

            fn encode(&self) -> Result<Vec<Value>> {
                Ok(vec![$(encode_value(&self.$idx)?),+])
            }

            fn decode(values: Vec<Value>) -> Result<Self> {
                check_arity(&values, $arity)?;
                let mut values = values.into_iter();
                Ok(($(decode_argument::<$name>(&mut values, $idx)?,)+))
            }
        }
    };
}

impl_arguments!(1; A: 0);
impl_arguments!(2; A: 0, B: 1);
impl_arguments!(3; A: 0, B: 1, C: 2);
impl_arguments!(4; A: 0, B: 1, C: 2, D: 3);
impl_arguments!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_arguments!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_arguments!(7; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_arguments!(8; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

/// Overload identity: method name plus ordered parameter descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_types: Vec<TypeDescriptor>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, parameter_types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
        }
    }

    /// Signature of a method named `name` taking the argument tuple `A`.
    pub fn of<A: Arguments>(name: impl Into<String>) -> Self {
        Self::new(name, A::descriptors())
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty)?;
        }
        f.write_str(")")
    }
}
