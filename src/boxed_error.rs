/// Define an error type `Foo(Box<FooKind>)` around an error kind
/// enum, keeping `Result<T, Foo>` one word wide. `Deref` gives access
/// to the kind (for matching), `From` is forwarded to the kind so
/// that `?` and thiserror's `#[from]` keep working.
#[macro_export]
macro_rules! def_boxed_error {
    ($wrappername:ident, $kindname:ident) => {

        #[derive(Debug)]
        pub struct $wrappername(Box<$kindname>);

        impl $wrappername {
            pub fn kind(&self) -> &$kindname {
                &self.0
            }
        }

        impl std::ops::Deref for $wrappername {
            type Target = $kindname;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<E> From<E> for $wrappername where $kindname: From<E> {
            fn from(err: E) -> Self {
                $wrappername(Box::new($kindname::from(err)))
            }
        }

        impl std::error::Error for $wrappername {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                self.0.source()
            }
        }

        impl std::fmt::Display for $wrappername {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                // the method call syntax is ambiguous here
                std::fmt::Display::fmt(&*self.0, f)
            }
        }
    }
}

/// `def_boxed_error` plus the kind enum itself, deriving
/// `thiserror::Error` and `Debug` on it.
#[macro_export]
macro_rules! def_boxed_thiserror {
    ($wrappername:ident, $(#[$meta:meta])* $vis:vis enum $kindname:ident {$($body:tt)*}) => {
        #[derive(thiserror::Error, Debug)]
        $(#[$meta])*
        $vis enum $kindname {
            $($body)*
        }

        $crate::def_boxed_error!($wrappername, $kindname);
    }
}
