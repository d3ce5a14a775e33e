use crate::task::TaskState;
use crate::ui::task_form::TaskForm;
use crate::ui::task_list::ListView;

pub const HELP: &str = "\
Commands:
  title <text>   set the task title
  desc <text>    set the task description
  add            submit the form
  done <n>       complete the n-th task in the list
  refresh        reload recent tasks
  help           show this message
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Title(String),
    Desc(String),
    Add,
    Done(usize),
    Refresh,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "title" => Ok(Command::Title(rest.to_string())),
            "desc" => Ok(Command::Desc(rest.to_string())),
            "add" => Ok(Command::Add),
            "done" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Command::Done)
                .ok_or_else(|| format!("done expects a task number, got {:?}", rest)),
            "refresh" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command {:?}, try help", other)),
        }
    }
}

/// Full screen: header, error banner, form, list.
pub fn render_app(state: &TaskState, form: &TaskForm) -> String {
    let mut lines = vec![
        "TaskFlow".to_string(),
        "Modern task management made simple".to_string(),
        String::new(),
    ];
    if let Some(error) = &state.error {
        lines.push(format!("⚠️ {}", error));
        lines.push(String::new());
    }
    lines.extend(form.render(state.loading));
    lines.push(String::new());
    lines.extend(ListView::from_state(state).render());
    lines.join("\n")
}
