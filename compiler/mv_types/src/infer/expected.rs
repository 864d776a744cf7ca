//! Top-down type expectations.

use crate::ty::Ty;

/// What the context of an expression expects its type to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// No information flows down.
    NoValue,
    ExpectType(Ty),
}

impl Expected {
    /// `None` and `Unknown` carry no information.
    pub fn from_type(ty: Option<Ty>) -> Self {
        match ty {
            Some(Ty::Unknown) | None => Expected::NoValue,
            Some(ty) => Expected::ExpectType(ty),
        }
    }

    #[inline]
    pub fn ty(&self) -> Option<&Ty> {
        match self {
            Expected::NoValue => None,
            Expected::ExpectType(ty) => Some(ty),
        }
    }

    #[inline]
    pub fn into_ty(self) -> Option<Ty> {
        match self {
            Expected::NoValue => None,
            Expected::ExpectType(ty) => Some(ty),
        }
    }
}

impl From<Ty> for Expected {
    fn from(ty: Ty) -> Self {
        Expected::from_type(Some(ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_no_expectation() {
        assert_eq!(Expected::from_type(Some(Ty::Unknown)), Expected::NoValue);
        assert_eq!(Expected::from_type(None), Expected::NoValue);
        assert_eq!(Expected::from(Ty::Bool).ty(), Some(&Ty::Bool));
    }
}
