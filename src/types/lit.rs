use {
    crate::types::VarId,
    std::{
        fmt,
        num::NonZeroU32,
        ops::{Index, IndexMut, Not},
    },
};

/// Literal encoded on `u32` as:
///
/// - the Literal corresponding to a positive occurrence of *variable `n` is `2 * n` and
/// - that for the negative one is `2 * n + 1`.
///
/// # Examples
///
/// ```
/// use sprep::types::*;
/// assert_eq!(2usize, Lit::from( 1i32).into());
/// assert_eq!(3usize, Lit::from(-1i32).into());
/// assert_eq!(4usize, Lit::from( 2i32).into());
/// assert_eq!(5usize, Lit::from(-2i32).into());
/// assert_eq!( 1i32, Lit::from( 1i32).into());
/// assert_eq!(-1i32, Lit::from(-1i32).into());
/// assert_eq!( 2i32, Lit::from( 2i32).into());
/// assert_eq!(-2i32, Lit::from(-2i32).into());
/// assert_eq!(Lit::from(-3i32), !Lit::from(3i32));
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Lit {
    /// literal encoded into folded u32
    ordinal: NonZeroU32,
}

/// a dummy literal used as the record separator of the extension stack.
pub const NULL_LIT: Lit = Lit {
    ordinal: match NonZeroU32::new(0x7FFF_FFFF) {
        Some(o) => o,
        None => panic!("zero"),
    },
};

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}L", i32::from(self))
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}L", i32::from(self))
    }
}

/// convert literals to `[i32]` (for debug).
pub fn i32s(v: &[Lit]) -> Vec<i32> {
    v.iter().map(|l| i32::from(*l)).collect::<Vec<_>>()
}

impl From<(VarId, bool)> for Lit {
    /// make a literal from a var and its polarity; `true` for the positive one.
    #[inline]
    fn from((vi, positive): (VarId, bool)) -> Self {
        debug_assert!(0 < vi);
        Lit {
            ordinal: NonZeroU32::new(((vi as u32) << 1) + (!positive as u32))
                .unwrap_or(NULL_LIT.ordinal),
        }
    }
}

impl From<usize> for Lit {
    #[inline]
    fn from(l: usize) -> Self {
        Lit {
            ordinal: NonZeroU32::new(l as u32).unwrap_or(NULL_LIT.ordinal),
        }
    }
}

impl From<i32> for Lit {
    #[inline]
    fn from(x: i32) -> Self {
        debug_assert!(x != 0);
        let ordinal = if x < 0 {
            ((-x) as u32) << 1 | 1
        } else {
            (x as u32) << 1
        };
        Lit {
            ordinal: NonZeroU32::new(ordinal).unwrap_or(NULL_LIT.ordinal),
        }
    }
}

impl From<Lit> for bool {
    /// - positive Lit (= even u32) => true
    /// - negative Lit (= odd u32)  => false
    #[inline]
    fn from(l: Lit) -> bool {
        (l.ordinal.get() & 1) == 0
    }
}

impl From<Lit> for usize {
    #[inline]
    fn from(l: Lit) -> usize {
        l.ordinal.get() as usize
    }
}

impl From<Lit> for i32 {
    #[inline]
    fn from(l: Lit) -> i32 {
        i32::from(&l)
    }
}

impl From<&Lit> for i32 {
    #[inline]
    fn from(l: &Lit) -> i32 {
        let v = (l.ordinal.get() >> 1) as i32;
        if l.ordinal.get() & 1 == 0 {
            v
        } else {
            -v
        }
    }
}

impl Not for Lit {
    type Output = Lit;
    #[inline]
    fn not(self) -> Self {
        Lit {
            ordinal: NonZeroU32::new(self.ordinal.get() ^ 1).unwrap_or(NULL_LIT.ordinal),
        }
    }
}

impl Lit {
    /// return the var index.
    #[inline]
    pub fn vi(self) -> VarId {
        (self.ordinal.get() >> 1) as VarId
    }
    /// return `true` if the literal is a positive occurrence of its var.
    #[inline]
    pub fn is_positive(self) -> bool {
        bool::from(self)
    }
    /// return the literal's value under an assignment of its var.
    #[inline]
    pub fn value_under(self, var_value: Option<bool>) -> Option<bool> {
        var_value.map(|b| b == self.is_positive())
    }
}

macro_rules! lit_indexed_vec {
    ($t: ty) => {
        impl Index<Lit> for Vec<$t> {
            type Output = $t;
            #[inline]
            fn index(&self, l: Lit) -> &Self::Output {
                &self[usize::from(l)]
            }
        }
        impl IndexMut<Lit> for Vec<$t> {
            #[inline]
            fn index_mut(&mut self, l: Lit) -> &mut Self::Output {
                &mut self[usize::from(l)]
            }
        }
    };
}

lit_indexed_vec!(bool);
lit_indexed_vec!(i32);
lit_indexed_vec!(u32);
lit_indexed_vec!(usize);
lit_indexed_vec!(Lit);
lit_indexed_vec!(Option<Lit>);
lit_indexed_vec!(Vec<Lit>);
