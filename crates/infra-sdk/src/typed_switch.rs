/// Dispatch over a closed set of value shapes, usually the variants of an enum.
///
/// Implementors write a single `match` in [`case`](TypedSwitch::case) and
/// return `None` for the shapes they do not handle; [`switch`](TypedSwitch::switch)
/// then falls back to `Output::default()`.
pub trait TypedSwitch<V: ?Sized> {
    type Output: Default;

    /// Handle `value`, or `None` to fall through to the default.
    fn case(&self, value: &V) -> Option<Self::Output>;

    fn switch(&self, value: &V) -> Self::Output {
        self.case(value).unwrap_or_default()
    }

    fn handles(&self, value: &V) -> bool {
        self.case(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Value {
        Predicate(fn(bool) -> bool),
        Text(String),
        Int(i32),
        Float(f64),
    }

    struct Weights;

    impl TypedSwitch<Value> for Weights {
        type Output = i32;

        fn case(&self, value: &Value) -> Option<i32> {
            match value {
                Value::Predicate(_) => Some(35),
                Value::Text(_) => Some(5),
                Value::Int(_) => Some(200),
                Value::Float(_) => None,
            }
        }
    }

    struct Render;

    impl TypedSwitch<Value> for Render {
        type Output = String;

        fn case(&self, value: &Value) -> Option<String> {
            match value {
                Value::Text(s) => Some(s.to_uppercase()),
                Value::Int(i) => Some((i * 2).to_string()),
                Value::Predicate(p) => Some(p(false).to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn dispatches_by_variant_with_default_fallback() {
        assert_eq!(Weights.switch(&Value::Predicate(|x| !x)), 35);
        assert_eq!(Weights.switch(&Value::Text("50".into())), 5);
        assert_eq!(Weights.switch(&Value::Int(25)), 200);
        assert_eq!(Weights.switch(&Value::Float(12.5)), 0);
        assert!(!Weights.handles(&Value::Float(0.0)));
        assert!(Weights.handles(&Value::Int(0)));
    }

    #[test]
    fn handler_sees_the_value() {
        assert_eq!(Render.switch(&Value::Text("abc".into())), "ABC");
        assert_eq!(Render.switch(&Value::Int(21)), "42");
        assert_eq!(Render.switch(&Value::Predicate(|x| !x)), "true");
        assert_eq!(Render.switch(&Value::Float(2.5)), "");
    }
}
