//! Declarative macros for reducing score type boilerplate.
//!
//! Every field-based score type shares the same level-wise arithmetic,
//! lexicographic ordering and slash-separated string format.

/// Generates `Ord`, `PartialOrd`, `Add`, `Sub`, and `Neg` for a field-based score type.
///
/// Fields must be listed most significant first; the constructor must accept
/// them in that order.
///
/// # Usage
/// ```ignore
/// impl_score_ops!(HardSoftScore { hard, soft } => of);
/// ```
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                std::cmp::Ordering::Equal
                    $( .then_with(|| self.$field.cmp(&other.$field)) )+
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor( $(self.$field + other.$field),+ )
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor( $(self.$field - other.$field),+ )
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor( $(-self.$field),+ )
            }
        }
    };
}

/// Generates `to_level_doubles`, `multiply`, and `abs` for `i64`-level scores.
///
/// Intended to be used *inside* an `impl Score for Type { ... }` block.
macro_rules! impl_score_scale {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        fn to_level_doubles(&self) -> Vec<f64> {
            vec![ $( self.$field as f64 ),+ ]
        }

        fn multiply(&self, multiplicand: f64) -> Self {
            $type::$ctor( $( (self.$field as f64 * multiplicand).round() as i64 ),+ )
        }

        fn abs(&self) -> Self {
            $type::$ctor( $( self.$field.abs() ),+ )
        }
    };
}

/// Generates `ParseableScore` for scores using the `"Xsuffix/Ysuffix"` format.
///
/// Each field maps to a suffix label and is parsed as `$num`.
///
/// # Usage
/// ```ignore
/// impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" } as i64 => of);
/// ```
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ } as $num:ty => $ctor:ident) => {
        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let s = s.trim();
                let parts: Vec<&str> = s.split('/').collect();
                let count = [ $($suffix),+ ].len();

                if parts.len() != count {
                    return Err($crate::score::traits::ScoreParseError::new(format!(
                        "invalid {} '{}': expected {} parts separated by '/'",
                        stringify!($type), s, count
                    )));
                }

                let mut parts = parts.into_iter();
                $(
                    let $field = {
                        let part = parts.next().unwrap_or_default().trim();
                        let number = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "{} part '{}' must end with '{}'",
                                stringify!($field), part, $suffix
                            ))
                        })?;
                        number.parse::<$num>().map_err(|e| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "invalid {} level '{}': {}",
                                stringify!($field), number, e
                            ))
                        })?
                    };
                )+

                Ok($type::$ctor( $($field),+ ))
            }

            fn to_string_repr(&self) -> String {
                let parts: Vec<String> = vec![ $( format!("{}{}", self.$field, $suffix) ),+ ];
                parts.join("/")
            }
        }
    };
}
