//! Task completion derived from task states. Never stored.

use shared::{domain::TaskState, protocol::JobTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub done: usize,
    pub active: usize,
}

impl Progress {
    /// `None` for a job without tasks, where fractions are undefined.
    pub fn of(tasks: &[JobTask]) -> Option<Self> {
        if tasks.is_empty() {
            return None;
        }
        let count = |state: TaskState| tasks.iter().filter(|t| t.task_state == state).count();
        Some(Self {
            total: tasks.len(),
            done: count(TaskState::Completed),
            active: count(TaskState::Active),
        })
    }

    pub fn done_fraction(&self) -> f64 {
        self.done as f64 / self.total as f64
    }

    pub fn active_fraction(&self) -> f64 {
        self.active as f64 / self.total as f64
    }

    pub fn percent_label(&self) -> String {
        format!("{} %", (self.done_fraction() * 100.0).round() as u32)
    }

    /// A text bar: `#` for completed tasks, `>` for active ones.
    pub fn render_bar(&self, width: usize) -> String {
        let done = cells(self.done_fraction(), width);
        let active = cells(self.active_fraction(), width).min(width - done);
        format!(
            "[{}{}{}] {}",
            "#".repeat(done),
            ">".repeat(active),
            " ".repeat(width - done - active),
            self.percent_label()
        )
    }
}

fn cells(fraction: f64, width: usize) -> usize {
    ((fraction * width as f64).round() as usize).min(width)
}
