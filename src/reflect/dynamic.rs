use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::reflect::descriptor::{FieldDescriptor, MessageDescriptor};
use crate::reflect::value::Value;
use crate::reflect::ReflectMessage;

/// A message instance backed by a descriptor and a field-number keyed table.
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    descriptor: Arc<MessageDescriptor>,
    values: BTreeMap<u32, Value>,
    oneof_cases: Vec<Option<u32>>,
}

impl DynamicMessage {
    #[must_use]
    pub fn new(descriptor: Arc<MessageDescriptor>) -> Self {
        let oneof_cases = vec![None; descriptor.oneofs.len()];
        Self {
            descriptor,
            values: BTreeMap::new(),
            oneof_cases,
        }
    }

    /// Set a field by number.
    ///
    /// Setting a oneof member makes it the active case and drops the value of
    /// the previously active member.
    pub fn set(&mut self, number: u32, value: impl Into<Value>) -> &mut Self {
        let oneof_index = self
            .descriptor
            .field_by_number(number)
            .and_then(|field| field.oneof_index);

        if let Some(case) = oneof_index.and_then(|index| self.oneof_cases.get_mut(index)) {
            if let Some(previous) = case.replace(number) {
                if previous != number {
                    self.values.remove(&previous);
                }
            }
        }

        self.values.insert(number, value.into());
        self
    }

    /// Builder form of [`DynamicMessage::set`].
    #[must_use]
    pub fn with(mut self, number: u32, value: impl Into<Value>) -> Self {
        self.set(number, value);
        self
    }

    /// Unset the oneof at `index` and drop its active member's value.
    pub fn clear_oneof(&mut self, index: usize) {
        if let Some(previous) = self.oneof_cases.get_mut(index).and_then(Option::take) {
            self.values.remove(&previous);
        }
    }

    /// Raw value previously set for `number`.
    #[must_use]
    pub fn value(&self, number: u32) -> Option<&Value> {
        self.values.get(&number)
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Message(Arc::new(self))
    }
}

impl ReflectMessage for DynamicMessage {
    fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn get(&self, field: &FieldDescriptor) -> Cow<'_, Value> {
        self.values
            .get(&field.number)
            .map_or_else(|| Cow::Owned(Value::default_for(field)), Cow::Borrowed)
    }

    fn oneof_case(&self, oneof_index: usize) -> Option<u32> {
        self.oneof_cases.get(oneof_index).copied().flatten()
    }
}

impl From<DynamicMessage> for Value {
    fn from(message: DynamicMessage) -> Self {
        message.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::descriptor::FieldKind;

    fn descriptor() -> Arc<MessageDescriptor> {
        Arc::new(
            MessageDescriptor::new("test.Choice")
                .with_oneof("choice")
                .with_field(FieldDescriptor::new("name", 1, FieldKind::String).in_oneof(0))
                .with_field(FieldDescriptor::new("id", 2, FieldKind::Int32).in_oneof(0))
                .with_field(FieldDescriptor::new("plain", 3, FieldKind::Bool)),
        )
    }

    #[test]
    fn setting_a_oneof_member_switches_the_case() {
        let mut message = DynamicMessage::new(descriptor());
        message.set(1, "a");
        assert_eq!(message.oneof_case(0), Some(1));

        message.set(2, 7_i32);
        assert_eq!(message.oneof_case(0), Some(2));
        assert!(message.value(1).is_none());
    }

    #[test]
    fn clear_oneof_removes_case_and_value() {
        let mut message = DynamicMessage::new(descriptor()).with(2, 7_i32);
        message.clear_oneof(0);
        assert_eq!(message.oneof_case(0), None);
        assert!(message.value(2).is_none());
    }

    #[test]
    fn unset_fields_read_as_default() {
        let message = DynamicMessage::new(descriptor());
        let field = FieldDescriptor::new("plain", 3, FieldKind::Bool);
        assert!(matches!(message.get(&field).as_ref(), Value::Bool(false)));
    }
}
