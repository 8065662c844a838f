//! Attribute Combinations

use smallvec::SmallVec;

/// One tuple of the cartesian product, one component per input list.
///
/// Two inline slots cover the colour × size case without allocating.
pub type Combination<'a, T> = SmallVec<[&'a T; 2]>;

/// N-ary cartesian product over `lists`, in lexicographic order of the inputs.
///
/// The first list varies slowest. A single list yields one 1-tuple per value;
/// no lists, or any empty list, yield no combinations.
#[must_use]
pub fn cartesian_product<'a, T, L>(lists: &'a [L]) -> Vec<Combination<'a, T>>
where
    L: AsRef<[T]>,
{
    if lists.is_empty() {
        return Vec::new();
    }

    lists.iter().fold(vec![Combination::new()], |acc, list| {
        acc.iter()
            .flat_map(|prefix| {
                list.as_ref().iter().map(move |value| {
                    let mut combination = prefix.clone();
                    combination.push(value);
                    combination
                })
            })
            .collect()
    })
}
