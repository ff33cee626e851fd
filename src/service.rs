use std::sync::Arc;

use tracing::info;

use crate::domain::{Department, Employee};
use crate::error::Result;
use crate::page::{Page, PageQuery};
use crate::store::Store;

/// Thin forwarding layer over the department store.
pub struct DepartmentService {
    departments: Arc<Store<Department>>,
}

impl DepartmentService {
    pub fn new(departments: Arc<Store<Department>>) -> Self {
        Self { departments }
    }

    pub fn save(&self, department: Department) -> Result<Department> {
        let department = self.departments.save(department)?;
        info!(id = department.id, name = %department.name, "department created");
        Ok(department)
    }

    pub fn get(&self, id: u64) -> Option<Department> {
        self.departments.get(id)
    }

    pub fn is_name_taken(&self, name: &str) -> Result<bool> {
        Ok(!self
            .departments
            .is_field_unique("name", Some(name.into()), None)?)
    }
}

/// Thin forwarding layer over the employee store; the only added rule is that
/// a referenced department must exist before the employee goes in.
pub struct EmployeeService {
    employees: Arc<Store<Employee>>,
    departments: Arc<Store<Department>>,
}

impl EmployeeService {
    pub fn new(employees: Arc<Store<Employee>>, departments: Arc<Store<Department>>) -> Self {
        Self {
            employees,
            departments,
        }
    }

    pub fn save(&self, employee: Employee) -> Result<Employee> {
        if let Some(department_id) = employee.department_id {
            self.departments.load(department_id)?;
        }
        let employee = self.employees.save(employee)?;
        info!(
            id = employee.id,
            name = %employee.name,
            department = employee.department_id,
            "employee created"
        );
        Ok(employee)
    }

    pub fn get(&self, id: u64) -> Option<Employee> {
        self.employees.get(id)
    }

    pub fn page(&self, query: &PageQuery) -> Result<Page<Employee>> {
        self.employees.find_page(query)
    }

    pub fn page_for_department(
        &self,
        department_id: u64,
        query: &PageQuery,
    ) -> Result<Page<Employee>> {
        self.employees
            .find_page_where(query, |e| e.department_id == Some(department_id))
    }
}
