/// Implements a basic `Debug` trait for types using their type name.
///
/// Used for descriptor parts that wrap closures, where the internal structure
/// can't be printed.
#[macro_export]
macro_rules! impl_debug {
    ($ty:ty) => {
        impl core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(core::any::type_name::<Self>())
            }
        }
    };
}

/// Declares an element factory function for a fixed tag.
macro_rules! element_factories {
    ($flags:expr; $($(#[$meta:meta])* $name:ident => $tag:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $name() -> $crate::VNode {
                $crate::VNode::from_tag($crate::ElementTag::with_flags($tag, $flags))
            }
        )*
    };
}
