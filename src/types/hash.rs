use once_cell::sync::OnceCell;

/// Lazily computed content hash of a frozen node.
///
/// Never participates in equality: two nodes are equal iff their fields are.
#[derive(Clone, Default)]
pub(crate) struct HashCache(OnceCell<u64>);

impl HashCache {
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> u64) -> u64 {
        *self.0.get_or_init(compute)
    }

    #[cfg(test)]
    pub(crate) fn is_computed(&self) -> bool {
        self.0.get().is_some()
    }
}

impl PartialEq for HashCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HashCache {}

/// Prints the same placeholder whether or not the hash has been computed,
/// so the debug form of a frozen node never changes.
impl std::fmt::Debug for HashCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("..")
    }
}

/// Implements `Hash` for a frozen node through its memoized `hash_code()`.
macro_rules! memoized_hash {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $ty {
            /// Content hash, computed on first request and cached for the
            /// lifetime of this instance.
            pub fn hash_code(&self) -> u64 {
                self.hash.get_or_compute(|| {
                    let mut hasher = ::rustc_hash::FxHasher::default();
                    $( ::std::hash::Hash::hash(&self.$field, &mut hasher); )+
                    ::std::hash::Hasher::finish(&hasher)
                })
            }
        }

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.hash_code());
            }
        }
    };
}

pub(crate) use memoized_hash;

