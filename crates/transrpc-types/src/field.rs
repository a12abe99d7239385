//! Typed field descriptors over sparse records.
//!
//! A field record ([`TorrentRecord`](crate::TorrentRecord),
//! [`SessionRecord`](crate::SessionRecord)) holds every member as an [`Optional`]; only the
//! fields that were requested come back present. A [`Field`] names one member: its wire key,
//! whether the daemon accepts writes to it, and how to reach it in a record. Callers build the
//! list of keys to request from [`FieldId`]s and read values back through the same [`Field`]s.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};

use crate::optional::Optional;

/// A typed accessor for one member of the record `R`.
pub struct Field<R, T> {
    wire_key: &'static str,
    mutable: bool,
    get: fn(&R) -> &Optional<T>,
    get_mut: fn(&mut R) -> &mut Optional<T>,
    present: fn(&R) -> bool,
}

impl<R, T> Field<R, T> {
    /// Describes a field. Used by the record declarations.
    pub const fn new(
        wire_key: &'static str,
        mutable: bool,
        get: fn(&R) -> &Optional<T>,
        get_mut: fn(&mut R) -> &mut Optional<T>,
        present: fn(&R) -> bool,
    ) -> Self {
        Self {
            wire_key,
            mutable,
            get,
            get_mut,
            present,
        }
    }

    /// The untyped identity of this field, for building request field lists.
    pub const fn id(&self) -> FieldId<R> {
        FieldId {
            wire_key: self.wire_key,
            mutable: self.mutable,
            present: self.present,
        }
    }

    /// The key used on the wire.
    pub const fn wire_key(&self) -> &'static str {
        self.wire_key
    }

    /// Whether the daemon accepts writes to this field.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// The field's value in `record`, or `None` if it was not requested.
    pub fn get<'r>(&self, record: &'r R) -> Option<&'r T> {
        (self.get)(record).get()
    }

    /// Stores `value` in `record`, marking the field present.
    pub fn set(&self, record: &mut R, value: T) {
        *(self.get_mut)(record) = Optional::Present(value);
    }

    /// Marks the field absent in `record`.
    pub fn clear(&self, record: &mut R) {
        *(self.get_mut)(record) = Optional::Absent;
    }
}

impl<R, T> Clone for Field<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T> Copy for Field<R, T> {}

impl<R, T> fmt::Debug for Field<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("wire_key", &self.wire_key)
            .field("mutable", &self.mutable)
            .finish()
    }
}

/// A field of `R` with its value type erased.
pub struct FieldId<R> {
    wire_key: &'static str,
    mutable: bool,
    present: fn(&R) -> bool,
}

impl<R> FieldId<R> {
    /// The key used on the wire.
    pub const fn wire_key(&self) -> &'static str {
        self.wire_key
    }

    /// Whether the daemon accepts writes to this field.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Whether the field is present in `record`.
    pub fn is_present(&self, record: &R) -> bool {
        (self.present)(record)
    }
}

impl<R> Clone for FieldId<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldId<R> {}

impl<R> PartialEq for FieldId<R> {
    fn eq(&self, other: &Self) -> bool {
        self.wire_key == other.wire_key
    }
}

impl<R> Eq for FieldId<R> {}

impl<R> fmt::Debug for FieldId<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldId").field(&self.wire_key).finish()
    }
}

impl<R, T> From<Field<R, T>> for FieldId<R> {
    fn from(field: Field<R, T>) -> Self {
        field.id()
    }
}

/// A sparse record whose members are all [`Optional`].
pub trait FieldRecord: Serialize + DeserializeOwned + Default + fmt::Display + 'static {
    /// Every field of the record, in declaration order.
    const FIELDS: &'static [FieldId<Self>];

    /// Wire keys of the fields present in this record.
    fn present_fields(&self) -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|field| field.is_present(self))
            .map(FieldId::wire_key)
            .collect()
    }

    /// Wire keys of present fields the daemon treats as read-only.
    fn present_read_only_fields(&self) -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|field| !field.is_mutable() && field.is_present(self))
            .map(FieldId::wire_key)
            .collect()
    }
}

/// Wire keys for `fields`, deduplicated by key and keeping the first occurrence's position.
pub fn wire_keys<R>(fields: &[FieldId<R>]) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = Vec::with_capacity(fields.len());
    for field in fields {
        if !keys.contains(&field.wire_key) {
            keys.push(field.wire_key);
        }
    }
    keys
}

macro_rules! field_mutability {
    (rw) => {
        true
    };
    (ro) => {
        false
    };
}

/// Declares a sparse record, its field descriptor namespace and its [`FieldRecord`] impl.
///
/// Each member is written as
/// `CONST name: Type = "wire-key", rw|ro [, with = "codec::path"];`
/// where `rw` marks a field the daemon accepts writes to.
macro_rules! field_record {
    (
        $(#[$record_meta:meta])*
        pub struct $record:ident;
        $(#[$fields_meta:meta])*
        pub struct $fields:ident;
        {
            $(
                $(#[doc = $doc:literal])*
                $konst:ident $name:ident: $ty:ty = $key:literal, $access:ident
                    $(, with = $with:literal)?;
            )+
        }
    ) => {
        $(#[$record_meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $record {
            $(
                $(#[doc = $doc])*
                #[serde(
                    rename = $key,
                    default,
                    skip_serializing_if = "crate::Optional::is_absent"
                    $(, with = $with)?
                )]
                pub $name: $crate::Optional<$ty>,
            )+
        }

        $(#[$fields_meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $fields;

        impl $fields {
            $(
                $(#[doc = $doc])*
                pub const $konst: $crate::Field<$record, $ty> = {
                    fn get(record: &$record) -> &$crate::Optional<$ty> {
                        &record.$name
                    }
                    fn get_mut(record: &mut $record) -> &mut $crate::Optional<$ty> {
                        &mut record.$name
                    }
                    fn present(record: &$record) -> bool {
                        record.$name.is_present()
                    }
                    $crate::Field::new(
                        $key,
                        $crate::field::field_mutability!($access),
                        get,
                        get_mut,
                        present,
                    )
                };
            )+
        }

        impl $crate::FieldRecord for $record {
            const FIELDS: &'static [$crate::FieldId<Self>] = &[$($fields::$konst.id()),+];
        }

        impl ::std::fmt::Display for $record {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut map = f.debug_map();
                $(
                    if let $crate::Optional::Present(value) = &self.$name {
                        map.entry(&format_args!("{}", $key), value);
                    }
                )+
                map.finish()
            }
        }
    };
}

pub(crate) use {field_mutability, field_record};
