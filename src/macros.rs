#[macro_export]
macro_rules! succ {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    // Handle true
    (true) => {
        $crate::Value::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Bool(false)
    };

    // Handle empty list
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Handle non-empty list
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::succ!($elem)),*])
    };

    // Handle empty map
    ({}) => {
        $crate::Value::Map($crate::SuccMap::new())
    };

    // Handle non-empty map
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::SuccMap::new();
        $(
            map.insert($key.to_string(), $crate::succ!($value));
        )*
        $crate::Value::Map(map)
    }};

    // Fallback for any expression
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
