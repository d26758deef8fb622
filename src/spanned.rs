use chumsky::span::SimpleSpan;

/// A value together with the region of the input it was parsed from. Equality and ordering only
/// consider the value, so two trees parsed from differently formatted inputs compare equal.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub span: SimpleSpan<usize>,
    pub val: T,
}

impl<T> Spanned<T> {
    pub fn new(val: T, span: SimpleSpan<usize>) -> Self {
        Self { span, val }
    }
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl<T: PartialOrd> PartialOrd for Spanned<T> {
    fn partial_cmp(&self, other: &Spanned<T>) -> Option<std::cmp::Ordering> {
        self.val.partial_cmp(&other.val)
    }
}
