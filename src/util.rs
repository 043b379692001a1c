//! Small macros used across the crate which needed a home

/// By-value builder methods, written like tiny functions whose body is a single field assignment:
///
/// ```ignore
/// setters! {
///     pub fn everyone_every(turns: u32) { everyone_interval = turns }
/// }
/// ```
macro_rules! setters {
    ( $(
        $( #[$meta:meta] )*
        $vis:vis fn $name:ident ( $( $pname:ident: $ptype:ty ),* $(,)? ) { $field:ident = $value:expr }
    )* ) => {
        $(
            $( #[$meta] )*
            #[must_use]
            $vis fn $name(mut self, $( $pname: $ptype ),*) -> Self {
                self.$field = $value;
                self
            }
        )*
    };
}

/// `Debug` for structs with fields too noisy (RNG state) or too big (a whole catalog) to print.
///
/// Fields before the first `;` are printed normally, `skip`ped ones show up as `..`, and `unless` ones are only
/// printed when they differ from the given value.
macro_rules! abbrev_debug {
    (
        $class:ident {
            $( $shown:ident ),* $(,)?
            $( ; skip $( $skipped:ident ),+ )?
            $( ; unless $( $sometimes:ident == $default:expr ),+ )?
        }
    ) => {
        impl fmt::Debug for $class {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut out = f.debug_struct(stringify!($class));
                $( out.field(stringify!($shown), &self.$shown); )*
                $( $( out.field(stringify!($skipped), &format_args!("..")); )+ )?
                $( $(
                    if self.$sometimes != $default {
                        out.field(stringify!($sometimes), &self.$sometimes);
                    }
                )+ )?
                out.finish()
            }
        }
    };
}

pub(crate) use {abbrev_debug, setters};
