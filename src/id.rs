use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! numeric_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
            pub struct $name {
                value: u64,
            }

            impl $name {
                pub fn new(id: u64) -> Self { Self { value: id } }

                pub fn value(self) -> u64 { self.value }

                /// Zero is never assigned by the server.
                pub fn is_unset(self) -> bool { self.value == 0 }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
                    where D: Deserializer<'de>,
                {
                    let id = u64::deserialize(deserializer)?;
                    Ok($name::new(id))
                }
            }

            impl Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                    where S: Serializer,
                {
                    serializer.serialize_u64(self.value)
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(f, "{}", self.value)
                }
            }
        )*
    };
}

numeric_id! {
    /// Identifier of a GitLab group.
    GroupId,
    /// Global identifier of a milestone; distinct from its per-group `iid`.
    MilestoneId,
    MergeRequestId,
}
