//! Bit-field packing helpers.
//!
//! Descriptors keep their narrow fields inside a single integer word, so
//! equality and hashing touch a handful of machine words instead of a dozen
//! enums. Every enum stored in a packed word implements [`PackedCode`]; the
//! [`packed_enum!`] macro checks at compile time that each discriminant fits
//! the declared width.

/// A value with a fixed-width integer code.
pub trait PackedCode: Copy {
    /// Number of bits the code occupies inside a packed word.
    const BITS: u32;

    fn to_code(self) -> u32;

    /// Decodes a code previously produced by [`PackedCode::to_code`].
    ///
    /// Codes outside the declared variant set are a broken invariant and panic.
    fn from_code(code: u32) -> Self;
}

impl PackedCode for bool {
    const BITS: u32 = 1;

    #[inline]
    fn to_code(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn from_code(code: u32) -> Self {
        code != 0
    }
}

#[inline]
#[must_use]
pub const fn mask(width: u32) -> u32 {
    if width >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

#[inline]
#[must_use]
pub const fn extract(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & mask(width)
}

#[inline]
#[must_use]
pub const fn insert(word: u32, shift: u32, width: u32, value: u32) -> u32 {
    let field = mask(width) << shift;
    (word & !field) | ((value << shift) & field)
}

/// Panics unless `value` is representable in `width` bits.
#[inline]
#[track_caller]
pub fn checked_width(value: u32, width: u32, what: &str) -> u32 {
    assert!(
        value <= mask(width),
        "{what} = {value} does not fit in {width} bits"
    );
    value
}

/// Declares a `#[repr(u8)]` enum usable as a packed field.
macro_rules! packed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $bits:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every variant, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl $crate::bits::PackedCode for $name {
            const BITS: u32 = $bits;

            #[inline]
            fn to_code(self) -> u32 {
                self as u32
            }

            #[inline]
            fn from_code(code: u32) -> Self {
                match code {
                    $( $value => Self::$variant, )+
                    _ => panic!("invalid {} code {code}", stringify!($name)),
                }
            }
        }

        const _: () = {
            $(
                assert!(
                    ($value as u32) < (1u32 << $bits),
                    concat!(stringify!($name), "::", stringify!($variant), " exceeds its packed width"),
                );
            )+
        };
    };
}

pub(crate) use packed_enum;

/// Generates `field()` / `set_field()` accessor pairs over one packed word.
///
/// Each field names a [`PackedCode`] type and its shift; the width comes from
/// [`PackedCode::BITS`].
macro_rules! bitfields {
    (
        $word:ident : $wty:ty {
            $( $(#[$fmeta:meta])* $field:ident : $fty:ident @ $shift:literal, )+
        }
    ) => {
        paste::paste! {
            $(
                $(#[$fmeta])*
                #[inline]
                #[must_use]
                pub fn $field(&self) -> $fty {
                    <$fty as $crate::bits::PackedCode>::from_code($crate::bits::extract(
                        u32::from(self.$word),
                        $shift,
                        <$fty as $crate::bits::PackedCode>::BITS,
                    ))
                }

                #[inline]
                pub fn [<set_ $field>](&mut self, value: $fty) {
                    self.$word = $crate::bits::insert(
                        u32::from(self.$word),
                        $shift,
                        <$fty as $crate::bits::PackedCode>::BITS,
                        $crate::bits::PackedCode::to_code(value),
                    ) as $wty;
                }
            )+
        }
    };
}

pub(crate) use bitfields;
