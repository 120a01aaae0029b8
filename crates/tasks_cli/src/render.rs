use cute_tasks_core::{Counts, Filter, Task};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    check: &'static str,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

pub fn status_mark(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

pub fn counters_line(counts: &Counts) -> String {
    format!(
        "Completed: {} | Uncompleted: {}",
        counts.completed, counts.active
    )
}

pub fn task_table(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "No tasks here yet.".to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id.to_string(),
        check: status_mark(task),
        text: task.text.clone(),
        created_at: task.created_at.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn counts_json(counts: &Counts) -> serde_json::Value {
    serde_json::json!({
        "completed": counts.completed,
        "uncompleted": counts.active,
    })
}

pub fn list_json(filter: Filter, tasks: &[&Task], counts: &Counts) -> serde_json::Value {
    serde_json::json!({
        "filter": filter,
        "tasks": tasks,
        "counts": counts_json(counts),
    })
}

#[cfg(test)]
mod tests {
    use super::{counters_line, list_json, task_table};
    use cute_tasks_core::{Counts, Filter, Task, TaskId};

    fn task(id: i64, text: &str, completed: bool) -> Task {
        Task {
            id: TaskId::from(id),
            text: text.to_string(),
            completed,
            created_at: "2025-12-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn table_lists_each_task_with_mark() {
        let done = task(1, "water plants", true);
        let open = task(2, "buy milk", false);

        let table = task_table(&[&done, &open]);

        assert!(table.contains("water plants"));
        assert!(table.contains("[x]"));
        assert!(table.contains("[ ]"));
        assert!(table.find("water plants") < table.find("buy milk"));
    }

    #[test]
    fn empty_table_prints_placeholder() {
        assert_eq!(task_table(&[]), "No tasks here yet.");
    }

    #[test]
    fn counters_line_uses_both_counts() {
        let counts = Counts {
            completed: 2,
            active: 3,
        };
        assert_eq!(counters_line(&counts), "Completed: 2 | Uncompleted: 3");
    }

    #[test]
    fn list_json_includes_filter_and_records() {
        let open = task(2, "buy milk", false);
        let counts = Counts {
            completed: 0,
            active: 1,
        };

        let json = list_json(Filter::Active, &[&open], &counts);

        assert_eq!(json["filter"], "active");
        assert_eq!(json["tasks"][0]["createdAt"], "2025-12-01T00:00:00.000Z");
        assert_eq!(json["counts"]["uncompleted"], 1);
    }
}
