use serde::{Deserialize, Serialize};

use crate::store::{Entity, FieldValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: Option<u64>,
    pub name: String,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Entity for Department {
    const NAME: &'static str = "department";
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::from),
            "name" => Some(FieldValue::from(self.name.as_str())),
            _ => None,
        }
    }
}

/// An employee belongs to at most one department, referenced by id; the
/// reference is checked at save time, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Option<u64>,
    pub name: String,
    pub department_id: Option<u64>,
}

impl Employee {
    pub fn new(name: impl Into<String>, department_id: Option<u64>) -> Self {
        Self {
            id: None,
            name: name.into(),
            department_id,
        }
    }
}

impl Entity for Employee {
    const NAME: &'static str = "employee";
    const FIELDS: &'static [&'static str] = &["id", "name", "department_id"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::from),
            "name" => Some(FieldValue::from(self.name.as_str())),
            "department_id" => self.department_id.map(FieldValue::from),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_answers_its_fields() {
        let mut dept = Department::new("IT");
        assert_eq!(dept.field("id"), None);
        assert_eq!(dept.field("name"), Some(FieldValue::from("IT")));
        assert_eq!(dept.field("budget"), None);

        dept.set_id(3);
        assert_eq!(dept.id(), Some(3));
        assert_eq!(dept.field("id"), Some(FieldValue::Int(3)));
    }

    #[test]
    fn employee_answers_its_fields() {
        let emp = Employee::new("Alice", Some(3));
        assert_eq!(emp.field("name"), Some(FieldValue::from("Alice")));
        assert_eq!(emp.field("department_id"), Some(FieldValue::Int(3)));

        let drifter = Employee::new("Bob", None);
        assert_eq!(drifter.field("department_id"), None);
    }

    #[test]
    fn employee_serializes_the_reference_in_camel_case() {
        let mut emp = Employee::new("Alice", Some(3));
        emp.set_id(1);
        let json = serde_json::to_string(&emp).unwrap();
        assert!(json.contains("\"departmentId\":3"));

        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(back, emp);
    }
}
