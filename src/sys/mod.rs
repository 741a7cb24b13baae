//! Raw C ABI of the vendor drivers, resolved at runtime.
//!
//! Each submodule mirrors one driver's exported surface: the function
//! signatures, callback types, and integer conventions of its header, and
//! nothing else. Symbols are bound with `libloading` when a device is opened,
//! so the crate builds and runs without any vendor SDK installed; a missing
//! driver surfaces as [`crate::Error::Load`].

pub mod picohrdl;
pub mod ps2000a;
pub mod ps5000a;
pub mod usbtc08;

/// Extract the NUL-terminated string a driver wrote into `buffer`.
///
/// The drivers fill the caller's buffer and report a length, but the length
/// conventions differ between families; trusting the terminator works for all
/// of them.
pub(crate) fn c_string(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&byte| byte == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

/// Declares the bound surface of one driver library.
///
/// Expands to a struct holding one `unsafe extern "C"` function pointer per
/// declared symbol, plus a loader that resolves every symbol up front —
/// a device either binds completely at open or fails with the missing symbol
/// named, never mid-capture.
macro_rules! bindings {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fn_meta:meta])*
                fn $sym:ident($($arg:ident: $arg_ty:ty),* $(,)?) -> $ret:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        #[allow(non_snake_case)]
        pub struct $name {
            _library: ::libloading::Library,
            $(
                $(#[$fn_meta])*
                pub $sym: unsafe extern "C" fn($($arg_ty),*) -> $ret,
            )*
        }

        impl $name {
            /// Load the shared library and resolve every declared symbol.
            ///
            /// # Safety
            ///
            /// Loading a library runs its initialisers. The caller must trust
            /// that `name` resolves to the vendor driver whose ABI this struct
            /// declares; a library exporting these names with different
            /// signatures would corrupt memory when called.
            #[allow(non_snake_case)]
            pub unsafe fn load(name: &::std::ffi::OsStr)
                    -> ::std::result::Result<Self, ::libloading::Error> {
                ::log::debug!("loading {:?}", name);
                let library = ::libloading::Library::new(name)?;
                $(
                    ::log::trace!("resolving {}", stringify!($sym));
                    let $sym = *library.get::<unsafe extern "C" fn($($arg_ty),*) -> $ret>(
                        concat!(stringify!($sym), "\0").as_bytes())?;
                )*
                Ok($name { _library: library, $($sym),* })
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name)).finish_non_exhaustive()
            }
        }
    };
}

pub(crate) use bindings;
