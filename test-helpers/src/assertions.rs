//! Assertion helpers for tests that return `eyre::Result`

/// Assert that a boolean value is true, return an error otherwise
#[macro_export]
macro_rules! assert_true_result {
    ($x:expr) => {
        if $x {
            Ok(())
        } else {
            Err(eyre::eyre!("Expected `{} == true`, got `false`", stringify!($x)))
        }
    };
}

/// Assert that two values are equal, return an error otherwise
#[macro_export]
macro_rules! assert_eq_result {
    ($x:expr, $y:expr) => {
        if $x == $y {
            Ok(())
        } else {
            Err(eyre::eyre!(
                "Expected `{} == {}`, got `{:?} == {:?}`",
                stringify!($x),
                stringify!($y),
                $x,
                $y
            ))
        }
    };
}

/// Assert that a validation result records an issue of the given severity and
/// category whose message contains a substring, return an error otherwise
#[macro_export]
macro_rules! assert_issue_result {
    ($result:expr, $severity:expr, $category:expr, $needle:expr) => {
        if $result
            .issues
            .iter()
            .any(|i| i.severity == $severity && i.category == $category && i.message.contains($needle))
        {
            Ok(())
        } else {
            Err(eyre::eyre!(
                "Expected a {:?}/{:?} issue containing `{}`, got {:?}",
                $severity,
                $category,
                $needle,
                $result.issues
            ))
        }
    };
}
