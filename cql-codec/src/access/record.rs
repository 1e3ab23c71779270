//! The record shape: named-field host structs.
//!
//! Unlike the sequence/mapping shapes, a record's fields are heterogeneously
//! typed, so there is no single `Item` associated type to parameterize over;
//! fields are handed back as `&dyn Encodable` / `&mut dyn Decodable` (see
//! `convert.rs`), the same `Any`-based dispatch the primitive conversion
//! matrix uses.

use crate::convert::{Decodable, Encodable};

/// Read access to a record's fields, resolved either positionally or by the
/// wire name the field was declared under (the `cql_record!` macro below
/// resolves the annotation-or-declared-name rule).
pub trait RecordExtract {
    fn field_count(&self) -> usize;
    fn field_name(&self, index: usize) -> Option<&str>;
    fn field_by_index(&self, index: usize) -> Option<&dyn Encodable>;

    /// Case-insensitive match against each field's wire name; `no accessible
    /// field` is the caller's job to raise when this returns `None`.
    fn field_by_name(&self, name: &str) -> Option<(usize, &dyn Encodable)> {
        (0..self.field_count()).find_map(|i| {
            let field_name = self.field_name(i)?;
            field_name
                .eq_ignore_ascii_case(name)
                .then(|| self.field_by_index(i).map(|v| (i, v)))
                .flatten()
        })
    }
}

/// Write access: the by-name lookup below does a one-shot linear resolution
/// per call.
pub trait RecordInject {
    fn field_count(&self) -> usize;
    fn field_name(&self, index: usize) -> Option<&str>;
    fn field_mut_by_index(&mut self, index: usize) -> Option<&mut dyn Decodable>;

    fn field_mut_by_name(&mut self, name: &str) -> Option<(usize, &mut dyn Decodable)> {
        let index = (0..self.field_count()).find(|&i| {
            self.field_name(i)
                .is_some_and(|field_name| field_name.eq_ignore_ascii_case(name))
        })?;
        self.field_mut_by_index(index).map(|v| (index, v))
    }
}

/// Declares a plain struct and implements [`RecordExtract`]/[`RecordInject`]
/// for it, resolving each field's wire name to either an explicit override
/// (`as "..."`) or its declared Rust identifier.
///
/// ```ignore
/// cql_record! {
///     pub struct Rider {
///         id: i32,
///         name: String as "display_name",
///     }
/// }
/// ```
#[macro_export]
macro_rules! cql_record {
    (
        $(#[$struct_meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident : $ty:ty $(as $wire:literal)? ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        $vis struct $name {
            $( pub $field: $ty ),*
        }

        impl $crate::access::RecordExtract for $name {
            fn field_count(&self) -> usize {
                $crate::cql_record!(@count $($field)*)
            }

            fn field_name(&self, index: usize) -> Option<&str> {
                let names: &[&str] = &[ $( $crate::cql_record!(@name $field $(, $wire)?) ),* ];
                names.get(index).copied()
            }

            fn field_by_index(&self, index: usize) -> Option<&dyn $crate::convert::Encodable> {
                let mut i = 0usize;
                $(
                    if i == index {
                        return Some(&self.$field as &dyn $crate::convert::Encodable);
                    }
                    i += 1;
                )*
                let _ = i;
                None
            }
        }

        impl $crate::access::RecordInject for $name {
            fn field_count(&self) -> usize {
                $crate::cql_record!(@count $($field)*)
            }

            fn field_name(&self, index: usize) -> Option<&str> {
                <Self as $crate::access::RecordExtract>::field_name(self, index)
            }

            fn field_mut_by_index(&mut self, index: usize) -> Option<&mut dyn $crate::convert::Decodable> {
                let mut i = 0usize;
                $(
                    if i == index {
                        return Some(&mut self.$field as &mut dyn $crate::convert::Decodable);
                    }
                    i += 1;
                )*
                let _ = i;
                None
            }
        }
    };

    (@count $($field:ident)*) => {
        0usize $( + { let _ = stringify!($field); 1usize } )*
    };

    (@name $field:ident, $wire:literal) => {
        $wire
    };

    (@name $field:ident) => {
        stringify!($field)
    };
}

/// Plain Rust tuples are positional-only records: no field names, so
/// `field_name` always returns `None`. This is what lets the tuple codec
/// accept a literal `(123, true, "abc")` without a wrapper type.
macro_rules! impl_record_for_tuple {
    ($($idx:tt : $t:ident),+) => {
        impl<$($t: 'static),+> RecordExtract for ($($t,)+) {
            fn field_count(&self) -> usize {
                impl_record_for_tuple!(@count $($t)+)
            }

            fn field_name(&self, _index: usize) -> Option<&str> {
                None
            }

            fn field_by_index(&self, index: usize) -> Option<&dyn Encodable> {
                match index {
                    $($idx => Some(&self.$idx as &dyn Encodable),)+
                    _ => None,
                }
            }
        }

        impl<$($t: 'static),+> RecordInject for ($($t,)+) {
            fn field_count(&self) -> usize {
                impl_record_for_tuple!(@count $($t)+)
            }

            fn field_name(&self, _index: usize) -> Option<&str> {
                None
            }

            fn field_mut_by_index(&mut self, index: usize) -> Option<&mut dyn Decodable> {
                match index {
                    $($idx => Some(&mut self.$idx as &mut dyn Decodable),)+
                    _ => None,
                }
            }
        }
    };

    (@count $($t:ident)+) => {
        0usize $( + { let _ = stringify!($t); 1usize } )+
    };
}

impl_record_for_tuple!(0: A);
impl_record_for_tuple!(0: A, 1: B);
impl_record_for_tuple!(0: A, 1: B, 2: C);
impl_record_for_tuple!(0: A, 1: B, 2: C, 3: D);
impl_record_for_tuple!(0: A, 1: B, 2: C, 3: D, 4: E);
impl_record_for_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
impl_record_for_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
impl_record_for_tuple!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);

#[cfg(test)]
mod tests {
    use super::*;

    cql_record! {
        #[derive(Debug, Default, PartialEq)]
        struct Rider {
            id: i32,
            name: String as "display_name",
        }
    }

    #[test]
    fn resolves_override_name_case_insensitively() {
        let rider = Rider {
            id: 7,
            name: "Primoz".to_owned(),
        };
        let (index, _) = RecordExtract::field_by_name(&rider, "DISPLAY_NAME").unwrap();
        assert_eq!(index, 1);
        assert!(RecordExtract::field_by_name(&rider, "name").is_none());
    }

    #[test]
    fn field_count_and_positional_access_agree() {
        let rider = Rider::default();
        assert_eq!(RecordExtract::field_count(&rider), 2);
        assert!(RecordExtract::field_by_index(&rider, 0).is_some());
        assert!(RecordExtract::field_by_index(&rider, 2).is_none());
    }
}
