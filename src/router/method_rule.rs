use crate::common::method::Method;

/// The set of methods a route accepts. Rules are only ever appended, and a rule set with no rules accepts every method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodRule {
    rules: Vec<Method>,
}

impl MethodRule {
    /// Creates a rule set that accepts every method.
    pub fn new() -> MethodRule {
        MethodRule::default()
    }

    /// Appends the method named by the given text. Text that names no method is added as UNKNOWN.
    pub fn add_rule(&mut self, rule: &str) {
        self.rules.push(Method::from_token(rule))
    }

    /// The methods added so far, in the order they were added.
    pub fn rules(&self) -> &[Method] {
        &self.rules
    }

    /// Checks if the given method is accepted.
    pub fn matches(&self, method: Method) -> bool {
        self.rules.is_empty() || self.rules.contains(&method)
    }
}

impl<'a> FromIterator<&'a str> for MethodRule {
    fn from_iter<I: IntoIterator<Item=&'a str>>(iter: I) -> Self {
        iter.into_iter().fold(MethodRule::new(), |mut rule, text| {
            rule.add_rule(text);
            rule
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::common::method::Method;
    use crate::router::method_rule::MethodRule;

    #[test]
    fn empty_rule_accepts_everything() {
        let rule = MethodRule::new();
        assert!(rule.matches(Method::GET));
        assert!(rule.matches(Method::UNKNOWN));
    }

    #[test]
    fn matches_added_methods_only() {
        let mut rule = MethodRule::new();
        rule.add_rule("get");
        rule.add_rule("POST");

        assert_eq!(rule.rules(), &[Method::GET, Method::POST]);
        assert!(rule.matches(Method::GET));
        assert!(rule.matches(Method::POST));
        assert!(!rule.matches(Method::PUT));
    }

    #[test]
    fn malformed_rule_does_not_abort() {
        let rule: MethodRule = vec!["GET", "not a method", "DELETE"].into_iter().collect();
        assert_eq!(rule.rules(), &[Method::GET, Method::UNKNOWN, Method::DELETE]);
        assert!(rule.matches(Method::DELETE));
        assert!(!rule.matches(Method::HEAD));
    }
}
