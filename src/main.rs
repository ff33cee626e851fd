use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use paged_store::config::Config;
use paged_store::domain::{Department, Employee};
use paged_store::page::{PageQuery, ASC};
use paged_store::service::{DepartmentService, EmployeeService};
use paged_store::store::Store;

const CONFIG_PATH: &str = "paged-store.toml";

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load_or_default(CONFIG_PATH)?;

    let departments = Arc::new(Store::new());
    let employees = Arc::new(Store::new());
    let department_service = DepartmentService::new(departments.clone());
    let employee_service = EmployeeService::new(employees, departments);

    let it = department_service.save(Department::new("IT"))?;
    employee_service.save(Employee::new("Alice", it.id))?;

    let sales = department_service.save(Department::new("Sales"))?;
    for (i, name) in [
        "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy", "Mallory",
        "Niaj", "Olivia",
    ]
    .into_iter()
    .enumerate()
    {
        let home = if i % 2 == 0 { &it } else { &sales };
        employee_service.save(Employee::new(name, home.id))?;
    }

    let mut query = PageQuery {
        page_size: config.pagination.effective_size(None),
        order_by: Some("name".into()),
        order_way: Some(ASC.into()),
        ..PageQuery::default()
    };

    loop {
        let page = employee_service.page(&query)?;
        info!(
            page = page.page_now,
            of = page.page_count()?,
            rows = page.row_count,
            "employee listing"
        );
        for employee in &page.items {
            info!(
                id = employee.id,
                name = %employee.name,
                department = employee.department_id,
                "employee"
            );
        }
        if !page.has_next()? {
            break;
        }
        query.page_now = page.next_page()?;
    }

    Ok(())
}
