// Domain models: goals, ledger entries, fixed expenses, dashboard

mod dashboard;
mod entry;
mod fixed_expense;
mod goal;

pub use dashboard::{CategoryTotal, Dashboard, GoalsSummary, Month, RECENT_ENTRIES_LIMIT};
pub use entry::{Entry, EntryKind, NewEntry};
pub use fixed_expense::{FixedExpense, FixedExpenseToggle, NewFixedExpense};
pub use goal::{
    DepositSchedule, Goal, GoalAutomation, GoalUpdate, GoalView, ManualDeposit, NewGoal,
    progress_percent,
};
