use std::{iter, slice};

#[cfg(feature = "widestring")]
use widestring::utfstr::CharsUtf32;
#[cfg(feature = "widestring")]
use widestring::{Utf32Str, Utf32String};

/// A trait for a thing that can produce a cloneable iterator of chars.
/// Common implementations include char, &str and &String.
pub trait IntoCharIter {
    type Iter: Iterator<Item = char> + Clone;
    fn chars(self) -> Self::Iter;
}

impl IntoCharIter for char {
    type Iter = iter::Once<char>;
    fn chars(self) -> Self::Iter {
        iter::once(self)
    }
}

impl<'a> IntoCharIter for &'a str {
    type Iter = std::str::Chars<'a>;
    fn chars(self) -> Self::Iter {
        str::chars(self)
    }
}

impl<'a> IntoCharIter for &'a String {
    type Iter = std::str::Chars<'a>;
    fn chars(self) -> Self::Iter {
        self.as_str().chars()
    }
}

impl<'a> IntoCharIter for &'a [char] {
    type Iter = iter::Copied<slice::Iter<'a, char>>;
    fn chars(self) -> Self::Iter {
        self.iter().copied()
    }
}

// Also support `str.chars()` itself.
impl<'a> IntoCharIter for std::str::Chars<'a> {
    type Iter = Self;
    fn chars(self) -> Self::Iter {
        self
    }
}

#[cfg(feature = "widestring")]
impl<'a> IntoCharIter for &'a Utf32Str {
    type Iter = CharsUtf32<'a>;
    fn chars(self) -> Self::Iter {
        Utf32Str::chars(self)
    }
}

#[cfg(feature = "widestring")]
impl<'a> IntoCharIter for &'a Utf32String {
    type Iter = CharsUtf32<'a>;
    fn chars(self) -> Self::Iter {
        self.as_utfstr().chars()
    }
}

// Also support `Utf32Str::chars()` itself.
#[cfg(feature = "widestring")]
impl<'a> IntoCharIter for CharsUtf32<'a> {
    type Iter = Self;
    fn chars(self) -> Self::Iter {
        self
    }
}
