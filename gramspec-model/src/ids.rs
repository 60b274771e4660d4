//! Integer handles into the arenas of a [`Specification`](crate::model::Specification).
//!
//! Every cross reference in the model (element to production, instance to
//! definition, field to scope) is one of these handles instead of a pointer.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw arena index.
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw arena index.
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn next(len: usize) -> Self {
                Self(len as u32)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// A namespace. The root namespace is always `NamespaceId(0)`.
    NamespaceId
);
define_id!(ScopeId);
define_id!(ObjectId);
define_id!(FieldId);
define_id!(RegionId);
define_id!(RegionImplId);
define_id!(RegionSetId);
define_id!(TokenDefId);
define_id!(
    /// A token instance. Instance ids double as the scanner's token ids.
    TokenInstanceId
);
define_id!(LexDefId);
define_id!(JoinId);
define_id!(ActionId);
define_id!(
    /// A production. The index is the global production number.
    ProductionId
);
define_id!(NtDefId);
define_id!(PatternId);
define_id!(ConstructorId);
define_id!(ParserTextId);
define_id!(FunctionId);
define_id!(ContextId);
define_id!(TypeAliasId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_index() {
        let id = ProductionId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(ProductionId::next(3), ProductionId::new(3));
        assert_eq!(id.to_string(), "7");
    }
}
