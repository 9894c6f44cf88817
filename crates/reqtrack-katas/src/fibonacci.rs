/// Upper bound on sequence steps. Any sequence that still grows reaches
/// `i64::MAX` well inside it (the standard one overflows after 92 steps);
/// a sequence that has not passed the candidate by then never will.
const MAX_STEPS: usize = 256;

/// Returns `true` if `candidate` belongs to the Fibonacci sequence seeded
/// with `0, 1`.
///
/// Negative candidates are never members.
pub fn is_fibonacci(candidate: i64) -> bool {
    is_fibonacci_from(candidate, 0, 1)
}

/// Returns `true` if `candidate` occurs in the Fibonacci-style sequence that
/// starts with the terms `previous, current`.
///
/// Both seeds count as members, so `is_fibonacci(0)` is `true`. This differs
/// from a walk that only compares against terms it has produced, which
/// would skip `previous` and report `0` as a non-member. Negative candidates
/// are never members.
/// Seeds that never grow past the candidate (e.g. `0, 0`) yield `false`
/// rather than looping, and so does arithmetic overflow.
///
/// ```
/// use reqtrack_katas::is_fibonacci_from;
///
/// // Lucas numbers: 2, 1, 3, 4, 7, 11, 18, ...
/// assert!(is_fibonacci_from(18, 2, 1));
/// assert!(!is_fibonacci_from(8, 2, 1));
/// ```
pub fn is_fibonacci_from(candidate: i64, previous: i64, current: i64) -> bool {
    if candidate < 0 {
        return false;
    }
    if previous == candidate {
        return true;
    }

    let (mut previous, mut current) = (previous, current);
    for _ in 0..MAX_STEPS {
        if current == candidate {
            return true;
        }
        if current > candidate {
            return false;
        }
        let Some(next) = previous.checked_add(current) else {
            return false;
        };
        (previous, current) = (current, next);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_member() {
        assert!(is_fibonacci(39_088_169));
    }

    #[test]
    fn large_non_member() {
        // 701_408_733 is F(44).
        assert!(!is_fibonacci(701_408_732));
        assert!(is_fibonacci(701_408_733));
    }

    #[test]
    fn small_members() {
        let members = [0, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];
        for n in 0..=144 {
            assert_eq!(is_fibonacci(n), members.contains(&n), "n = {n}");
        }
    }

    #[test]
    fn negatives_are_never_members() {
        assert!(!is_fibonacci(-1));
        assert!(!is_fibonacci(i64::MIN));
        assert!(!is_fibonacci_from(-3, -1, -2));
    }

    #[test]
    fn largest_i64_term() {
        // F(92) is the largest Fibonacci number that fits in an i64.
        assert!(is_fibonacci(7_540_113_804_746_346_429));
        assert!(!is_fibonacci(i64::MAX));
    }

    #[test]
    fn custom_seeds() {
        assert!(is_fibonacci_from(29, 2, 1));
        assert!(is_fibonacci_from(2, 2, 1));
        assert!(!is_fibonacci_from(0, 2, 1));
        assert!(is_fibonacci_from(10, 0, 10));
    }

    #[test]
    fn degenerate_seeds_terminate() {
        assert!(!is_fibonacci_from(5, 0, 0));
        assert!(is_fibonacci_from(0, 0, 0));
        assert!(!is_fibonacci_from(5, 1, -1));
        assert!(!is_fibonacci_from(5, -1, -1));
    }
}
