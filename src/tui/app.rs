use ratatui::widgets::TableState;

use crate::filters::{combined_filter, sort_for_display, visible_weekdays};
use crate::models::{Category, FilterOptions, NewTask, Priority, Task, TaskUpdate, Weekday};
use crate::reference::{current_weekday, next_weekday, previous_weekday, suggested_categories_for, CATEGORIES};
use crate::repository::TaskRepository;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
    Searching,
}

/// Which completed tasks are shown.
#[derive(Clone, Copy, PartialEq)]
pub enum CompletionFilter {
    All,
    Pending,
    Done,
}

impl CompletionFilter {
    fn next(self) -> Self {
        match self {
            CompletionFilter::All => CompletionFilter::Pending,
            CompletionFilter::Pending => CompletionFilter::Done,
            CompletionFilter::Done => CompletionFilter::All,
        }
    }

    fn as_option(self) -> Option<bool> {
        match self {
            CompletionFilter::All => None,
            CompletionFilter::Pending => Some(false),
            CompletionFilter::Done => Some(true),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompletionFilter::All => "all",
            CompletionFilter::Pending => "pending",
            CompletionFilter::Done => "done",
        }
    }
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub step: usize, // 0: Title, 1: Description, 2: Category, 3: Priority
}

pub struct App {
    pub repo: TaskRepository,
    /// Tasks of the selected day after filtering, in display order.
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub selected_weekday: Weekday,
    pub weekend_mode: bool,
    pub category_filter: Option<Category>,
    pub priority_filter: Option<Priority>,
    pub completion_filter: CompletionFilter,
    pub search_term: String,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub target_id: Option<String>,
    pub add_state: AddState,
    pub message: Option<String>,
}

impl App {
    /// Creates the app on today's weekday.
    pub fn new(repo: TaskRepository) -> App {
        let mut app = App {
            repo,
            tasks: Vec::new(),
            state: TableState::default(),
            selected_weekday: current_weekday(),
            weekend_mode: false,
            category_filter: None,
            priority_filter: None,
            completion_filter: CompletionFilter::All,
            search_term: String::new(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            message: None,
        };
        app.reload();
        app
    }

    /// Filter options for the current view.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            category: self.category_filter,
            completed: self.completion_filter.as_option(),
            priority: self.priority_filter,
            search_term: Some(self.search_term.clone()).filter(|s| !s.is_empty()),
            weekday: Some(self.selected_weekday),
            show_weekend_only: self.weekend_mode.then_some(true),
        }
    }

    /// Recomputes the visible tasks and clamps the selection.
    pub fn reload(&mut self) {
        self.tasks = sort_for_display(&combined_filter(self.repo.tasks(), &self.filter_options()));
        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next task in the list.
    pub fn next(&mut self) {
        if self.tasks.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i < self.tasks.len() - 1 => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task in the list.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Moves to the following visible weekday.
    pub fn next_day(&mut self) {
        self.step_day(next_weekday);
    }

    /// Moves to the preceding visible weekday.
    pub fn previous_day(&mut self) {
        self.step_day(previous_weekday);
    }

    fn step_day(&mut self, step: fn(Weekday) -> Weekday) {
        let visible = visible_weekdays(self.weekend_mode);
        let mut day = step(self.selected_weekday);
        while !visible.contains(&day) {
            day = step(day);
        }
        self.selected_weekday = day;
        self.state.select(None);
        self.reload();
    }

    /// Switches weekend mode, jumping to Saturday if the selected day is hidden.
    pub fn toggle_weekend_mode(&mut self) {
        self.weekend_mode = !self.weekend_mode;
        if !visible_weekdays(self.weekend_mode).contains(&self.selected_weekday) {
            self.selected_weekday = Weekday::Saturday;
            self.state.select(None);
        }
        self.reload();
    }

    pub fn cycle_category_filter(&mut self) {
        self.category_filter = match self.category_filter {
            None => Some(CATEGORIES[0].key),
            Some(c) => CATEGORIES.get(c.index() + 1).map(|info| info.key),
        };
        self.reload();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.priority_filter = match self.priority_filter {
            None => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
        };
        self.reload();
    }

    pub fn cycle_completion_filter(&mut self) {
        self.completion_filter = self.completion_filter.next();
        self.reload();
    }

    fn selected_id(&self) -> Option<String> {
        self.state
            .selected()
            .and_then(|i| self.tasks.get(i))
            .map(|t| t.id.clone())
    }

    /// Toggles completion of the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.repo.toggle_complete(&id);
            self.reload();
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.repo.remove(&id);
            self.reload();
        }
    }

    pub fn clear_completed(&mut self) {
        let removed = self.repo.clear_completed();
        self.message = Some(format!("Cleared {} completed task(s)", removed));
        self.reload();
    }

    /// Initiates the "Add Task" wizard for the selected day.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing the title of the selected task.
    pub fn start_edit(&mut self) {
        if let Some(i) = self.state.selected() {
            if let Some(t) = self.tasks.get(i) {
                self.target_id = Some(t.id.clone());
                self.input_buffer = t.title.clone();
                self.input_mode = InputMode::Editing;
            }
        }
    }

    pub fn start_search(&mut self) {
        self.input_buffer = self.search_term.clone();
        self.input_mode = InputMode::Searching;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Searching => {
                self.search_term = self.input_buffer.trim().to_string();
                self.cancel_input();
                self.state.select(None);
                self.reload();
            }
            InputMode::Normal => {}
        }
    }

    /// Category prompt choices, suggested order for the selected day.
    pub fn category_choices(&self) -> Vec<Category> {
        suggested_categories_for(self.selected_weekday).iter().map(|c| c.key).collect()
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => { // Title
                if !input.is_empty() {
                    self.add_state.title = input;
                    self.add_state.step += 1;
                }
            }
            1 => { // Description
                self.add_state.description = Some(input).filter(|d| !d.is_empty());
                self.add_state.step += 1;
            }
            2 => { // Category: blank takes the first suggestion
                let choices = self.category_choices();
                let chosen = if input.is_empty() {
                    choices.first().copied()
                } else {
                    input.parse::<Category>().ok()
                };
                match chosen {
                    Some(c) => {
                        self.add_state.category = Some(c);
                        self.add_state.step += 1;
                    }
                    None => self.message = Some(format!("Unknown category '{}'", input)),
                }
            }
            3 => { // Priority: blank is medium
                let priority = if input.is_empty() { Ok(Priority::Medium) } else { input.parse::<Priority>() };
                match priority {
                    Ok(p) => {
                        let mut data = NewTask::new(self.add_state.title.clone(), self.selected_weekday)
                            .category(self.add_state.category.unwrap_or(Category::Other))
                            .priority(p);
                        data.description = self.add_state.description.take();
                        if let Err(e) = self.repo.add(data) {
                            self.message = Some(e.to_string());
                        }
                        self.input_mode = InputMode::Normal;
                        self.reload();
                    }
                    Err(e) => self.message = Some(e.to_string()),
                }
            }
            _ => {}
        }
        self.input_buffer.clear();
    }

    /// Handles input for the title edit.
    fn handle_editing_input(&mut self) {
        if let Some(id) = self.target_id.take() {
            let update = TaskUpdate { title: Some(self.input_buffer.clone()), ..TaskUpdate::default() };
            if let Err(e) = self.repo.update(&id, update) {
                self.message = Some(e.to_string());
            }
        }
        self.cancel_input();
        self.reload();
    }
}
