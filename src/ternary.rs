/// A conditional expression that `cargo fmt` leaves on one line.
/// Border handling in the kernels is a table of "inside the plane?
/// use the cell : use the padding" choices, and it reads best when
/// each one fits on a single line.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}
