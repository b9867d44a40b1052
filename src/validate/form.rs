// Field-level form state: values, errors, and the rules that connect them.
//
// Rules run synchronously on every change event against the full current
// value set, so cross-field rules (confirm-password, dependent lookups) see
// a consistent snapshot. The original server-supplied values are captured
// once at construction and never mutated; changed-field detection diffs
// against that snapshot on demand.

use std::collections::BTreeMap;

/// Current field values, keyed by field name
pub type FormValues = BTreeMap<String, String>;

/// A validation rule: returns the error message for a value, or None when
/// the value passes. The second argument is the full value set for
/// cross-field rules.
pub type Rule = Box<dyn Fn(&str, &FormValues) -> Option<String> + Send + Sync>;

pub struct FormState {
    original: FormValues,
    values: FormValues,
    errors: BTreeMap<String, String>,
    rules: BTreeMap<String, Rule>,
}

impl FormState {
    /// Capture the initial values as the immutable original snapshot
    pub fn new(initial: FormValues) -> Self {
        Self {
            original: initial.clone(),
            values: initial,
            errors: BTreeMap::new(),
            rules: BTreeMap::new(),
        }
    }

    /// Attach a rule to a field (builder style)
    pub fn rule<F>(mut self, field: &str, rule: F) -> Self
    where
        F: Fn(&str, &FormValues) -> Option<String> + Send + Sync + 'static,
    {
        self.rules.insert(field.to_string(), Box::new(rule));
        self
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn original(&self, field: &str) -> &str {
        self.original.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str).filter(|e| !e.is_empty())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .filter(|(_, e)| !e.is_empty())
            .map(|(f, e)| (f.as_str(), e.as_str()))
    }

    /// Set a value without running its rule (programmatic updates such as
    /// applying a server-resolved owner name)
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    /// Record an error produced outside the rule set, e.g. a failed
    /// server-side lookup
    pub fn set_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    /// Set a value and immediately re-run the field's rule against the
    /// updated value set
    pub fn handle_change(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        self.values.insert(field.to_string(), value.clone());
        self.validate_field(field, &value);
    }

    /// Run the configured rule for one field, recording the outcome
    pub fn validate_field(&mut self, field: &str, value: &str) {
        let error = self
            .rules
            .get(field)
            .and_then(|rule| rule(value, &self.values));
        self.errors.insert(field.to_string(), error.unwrap_or_default());
    }

    /// Run a one-off substitute rule instead of the configured one, e.g.
    /// membership in a server-fetched suggestion list
    pub fn validate_field_with<F>(&mut self, field: &str, value: &str, rule: F)
    where
        F: Fn(&str, &FormValues) -> Option<String>,
    {
        let error = rule(value, &self.values);
        self.errors.insert(field.to_string(), error.unwrap_or_default());
    }

    /// Run every configured rule; the gate before any submission
    pub fn validate_all(&mut self) -> bool {
        let mut valid = true;
        let mut new_errors = BTreeMap::new();

        for (field, rule) in &self.rules {
            let value = self.values.get(field).map(String::as_str).unwrap_or("");
            let error = rule(value, &self.values);
            if error.is_some() {
                valid = false;
            }
            new_errors.insert(field.clone(), error.unwrap_or_default());
        }

        self.errors.extend(new_errors);
        valid
    }

    /// Restore the original values and clear every error
    pub fn reset(&mut self) {
        self.values = self.original.clone();
        self.errors.clear();
    }

    /// Fields from `editable` whose current value strictly differs from the
    /// original snapshot, with their current values
    pub fn changed_fields(&self, editable: &[&str]) -> FormValues {
        let mut changed = FormValues::new();
        for field in editable {
            let current = self.value(field);
            if current != self.original(field) {
                changed.insert((*field).to_string(), current.to_string());
            }
        }
        changed
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
