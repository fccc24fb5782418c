//! The four section terminals: what they print and how fast.

use std::time::Duration;

use chrono::{DateTime, Local};
use rand::Rng;

use crate::content::{self, EXPERIENCE, PROJECTS, SKILLS};
use crate::reveal::{Pacing, ScriptedReveal, SubCommandPacing, TerminalScript};

pub const HERO_COMMAND: &str = "python portfolio.py --render --mode=interactive";
pub const SKILLS_COMMAND: &str = "ls -la skills/ --analyze --verbose";
pub const PROJECTS_COMMAND: &str = "git clone https://github.com/HassanNazmul";
pub const PHILOSOPHY_COMMAND: &str = "cd ~/philosophy && ./manifesto.sh";

pub const CV_COMMAND: &str = "generate-cv --format=pdf --output=NazmulHassanResume.pdf";

const COMPLETION_DELAY: Duration = Duration::from_millis(500);

pub const SKILLS_THRESHOLD: f32 = 0.5;
pub const PROJECTS_THRESHOLD: f32 = 0.5;
pub const PHILOSOPHY_THRESHOLD: f32 = 0.5;

/// Which terminal a panel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Hero,
    Skills,
    Projects,
    Philosophy,
}

impl TerminalKind {
    pub fn title(self) -> &'static str {
        match self {
            TerminalKind::Hero => "portfolio.py",
            TerminalKind::Skills => "skills",
            TerminalKind::Projects => "projects",
            TerminalKind::Philosophy => "philosophy",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            TerminalKind::Hero => "nazmul@portfolio:~$",
            TerminalKind::Skills => "nazmul@skills:~$",
            TerminalKind::Projects => "nazmul@projects:~$",
            TerminalKind::Philosophy => "nazmul@philosophy:~$",
        }
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn hero_line_delay(line: &str) -> Duration {
    if line.starts_with("import") || line.starts_with("from") {
        ms(200)
    } else if line.starts_with('$') || line.starts_with(">>>") {
        ms(600)
    } else if line.contains('{') || line.contains('[') {
        ms(800)
    } else if line.chars().count() < 30 {
        ms(300)
    } else {
        ms(400)
    }
}

fn skills_line_delay(line: &str) -> Duration {
    const PROCESS: [&str; 5] = ["Analyzing", "Scanning", "Evaluating", "Generating", "Skills analysis"];
    if PROCESS.iter().any(|p| line.starts_with(p)) {
        ms(800)
    } else if line.is_empty() {
        ms(300)
    } else {
        ms(100)
    }
}

fn projects_line_delay(line: &str) -> Duration {
    if line.starts_with("Cloning") || line.starts_with("Projects successfully") || line.starts_with("# ") {
        ms(800)
    } else if line.starts_with('$') {
        ms(600)
    } else if line.is_empty() {
        ms(300)
    } else {
        ms(150)
    }
}

fn philosophy_line_delay(line: &str) -> Duration {
    if line.starts_with('#') || line.starts_with("===") || line.starts_with("---") {
        ms(800)
    } else if line.is_empty() {
        ms(300)
    } else {
        ms(150)
    }
}

fn is_shell_command(line: &str) -> bool {
    const COMMANDS: [&str; 6] = ["cat", "ls", "echo", "cd", "python", "clear"];
    let first = line.split_whitespace().next().unwrap_or("");
    COMMANDS.contains(&first)
}

pub fn pacing(kind: TerminalKind) -> Pacing {
    match kind {
        TerminalKind::Hero => Pacing {
            typing_ms: 30..=60,
            command_pause: ms(300),
            line_delay: hero_line_delay,
            sub_command: None,
            completion_delay: COMPLETION_DELAY,
        },
        TerminalKind::Skills => Pacing {
            typing_ms: 50..=100,
            command_pause: ms(500),
            line_delay: skills_line_delay,
            sub_command: None,
            completion_delay: COMPLETION_DELAY,
        },
        TerminalKind::Projects => Pacing {
            typing_ms: 50..=100,
            command_pause: ms(500),
            line_delay: projects_line_delay,
            sub_command: None,
            completion_delay: COMPLETION_DELAY,
        },
        TerminalKind::Philosophy => Pacing {
            typing_ms: 80..=150,
            command_pause: ms(800),
            line_delay: philosophy_line_delay,
            sub_command: Some(SubCommandPacing {
                is_sub_command: is_shell_command,
                typing_ms: 80..=150,
                pause: ms(500),
            }),
            completion_delay: COMPLETION_DELAY,
        },
    }
}

pub fn threshold(kind: TerminalKind) -> f32 {
    match kind {
        // The landing section starts on mount.
        TerminalKind::Hero => 0.0,
        TerminalKind::Skills => SKILLS_THRESHOLD,
        TerminalKind::Projects => PROJECTS_THRESHOLD,
        TerminalKind::Philosophy => PHILOSOPHY_THRESHOLD,
    }
}

/// Build the script for `kind`. Timestamps and sizes come from `now` and `rng`.
pub fn script(kind: TerminalKind, now: DateTime<Local>, rng: &mut impl Rng) -> TerminalScript {
    match kind {
        TerminalKind::Hero => hero_script(now, rng),
        TerminalKind::Skills => skills_script(now, rng),
        TerminalKind::Projects => projects_script(now, rng),
        TerminalKind::Philosophy => philosophy_script(),
    }
}

/// A fresh, not yet started terminal for `kind`.
pub fn terminal(kind: TerminalKind) -> ScriptedReveal {
    let mut rng = rand::thread_rng();
    ScriptedReveal::new(script(kind, Local::now(), &mut rng), pacing(kind), threshold(kind))
}

fn hero_script(now: DateTime<Local>, rng: &mut impl Rng) -> TerminalScript {
    let time = now.format("%H:%M:%S");
    let memory: u32 = rng.gen_range(200..=500);
    let lines = vec![
        format!("[{}] Initializing portfolio environment...", time),
        "Loading UI components and styles...".to_string(),
        "$ cd ~/workspace/nahid.dev".to_string(),
        "$ python start.py --mode=interactive".to_string(),
        "→ Initialising environment: Python, React, Tailwind".to_string(),
        "→ Importing core modules: skills, projects, experience".to_string(),
        "→ Connecting to PostgreSQL database...".to_string(),
        format!(
            "→ Loaded {} projects, {} skills, {} experience items",
            PROJECTS.len(),
            SKILLS.len(),
            EXPERIENCE.len()
        ),
        "→ Setting up responsive layout and animations...".to_string(),
        format!("[INFO] Memory usage: {}MB", memory),
        "Portfolio server running at https://NazmulHassan.dev".to_string(),
        ">>> show.sections()".to_string(),
        "['hero', 'skills', 'projects', 'experience', 'philosophy', 'contact']".to_string(),
        ">>> skills.top()".to_string(),
        "['Machine Learning', 'AI Agent Dev', 'Backend Engineering']".to_string(),
        ">>> render.portfolio()".to_string(),
        format!("Portfolio ready at {}", time),
    ];
    TerminalScript {
        command: HERO_COMMAND.to_string(),
        lines,
    }
}

fn listing_date(now: DateTime<Local>) -> String {
    now.format("%d %b %H:%M").to_string()
}

fn file_line(name: &str, date: &str, rng: &mut impl Rng) -> String {
    let size: f64 = rng.gen_range(1.5..3.5);
    format!("-rw-r--r--  1 nazmul  staff  {:.1}K {} {}", size, date, name)
}

fn directory_header(date: &str) -> Vec<String> {
    vec![
        "total 8".to_string(),
        format!("drwxr-xr-x  2 nazmul  staff  256 {} .", date),
        format!("drwxr-xr-x 12 nazmul  staff  384 {} ..", date),
    ]
}

fn skills_script(now: DateTime<Local>, rng: &mut impl Rng) -> TerminalScript {
    let date = listing_date(now);
    let mut lines = directory_header(&date);
    for skill in SKILLS {
        let file = format!("{}.skill", content::kebab(skill.name));
        lines.push(file_line(&file, &date, rng));
    }
    lines.extend(
        [
            "",
            "Analyzing skill proficiency...",
            "Scanning technical capabilities...",
            "Evaluating expertise levels...",
            "Generating skill matrix...",
            "Skills analysis complete. Displaying results:",
        ]
        .map(String::from),
    );
    TerminalScript {
        command: SKILLS_COMMAND.to_string(),
        lines,
    }
}

fn projects_script(now: DateTime<Local>, rng: &mut impl Rng) -> TerminalScript {
    let date = listing_date(now);
    let mut lines: Vec<String> = [
        "Cloning into 'projects'...",
        "remote: Enumerating objects: 247, done.",
        "remote: Counting objects: 100% (247/247), done.",
        "remote: Compressing objects: 100% (203/203), done.",
        "Receiving objects: 100% (247/247), 42.5 MiB | 10.2 MiB/s, done.",
        "Resolving deltas: 100% (124/124), done.",
        "",
        "$ cd projects",
        "$ ls -la",
    ]
    .map(String::from)
    .to_vec();
    lines.extend(directory_header(&date));
    for project in PROJECTS {
        let file = format!("{}.project", content::kebab(project.name));
        lines.push(file_line(&file, &date, rng));
    }
    lines.extend(
        [
            "",
            "$ cat README.md",
            "# Nazmul Hassan's Project Portfolio",
            "A collection of machine learning, data science, and AI projects.",
            "Each project demonstrates different technical skills and problem-solving approaches.",
            "",
            "Projects successfully loaded. Displaying portfolio...",
        ]
        .map(String::from),
    );
    TerminalScript {
        command: PROJECTS_COMMAND.to_string(),
        lines,
    }
}

fn philosophy_script() -> TerminalScript {
    let lines = [
        "# Engineering Philosophy",
        "===========================",
        "",
        "cat principles.txt",
        "1. Build systems that explain themselves.",
        "2. Measure before optimising, then measure again.",
        "3. Data quality beats model complexity.",
        "4. Ship small, learn fast, iterate.",
        "",
        "echo $APPROACH",
        "Research-minded, production-focused.",
        "",
        "python -c \"import this\" | head -n 3",
        "Beautiful is better than ugly.",
        "Explicit is better than implicit.",
        "Simple is better than complex.",
        "---",
        "\"Make it work, make it right, make it fast.\"",
    ]
    .map(String::from)
    .to_vec();
    TerminalScript {
        command: PHILOSOPHY_COMMAND.to_string(),
        lines,
    }
}

/// Output of the "view CV" action, injected into the hero terminal.
pub fn cv_output() -> Vec<String> {
    vec![
        "Starting CV generator...".to_string(),
        "→ Collecting experience and education data...".to_string(),
        "→ Formatting skills and certifications...".to_string(),
        "→ Applying clean professional template...".to_string(),
        format!("✔ CV created successfully: {}", content::CV_FILE),
        "→ Opening CV in new window...".to_string(),
    ]
}

/// How a terminal line is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Prompt,
    PythonPrompt,
    Status,
    Heading,
    Bullet,
    Success,
    Listing,
    Process,
    Data,
    Quote,
    Plain,
}

pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.starts_with('$') {
        LineKind::Prompt
    } else if trimmed.starts_with(">>>") {
        LineKind::PythonPrompt
    } else if trimmed.starts_with("['") || trimmed.starts_with('{') {
        LineKind::Data
    } else if trimmed.starts_with('[') {
        LineKind::Status
    } else if trimmed.starts_with('#') || trimmed.starts_with("===") || trimmed.starts_with("---") {
        LineKind::Heading
    } else if trimmed.starts_with('→')
        || (trimmed.starts_with(|c: char| c.is_ascii_digit()) && trimmed.contains(". "))
    {
        LineKind::Bullet
    } else if trimmed.starts_with('✔')
        || trimmed.contains("successfully")
        || trimmed.contains("complete")
        || trimmed.starts_with("Portfolio ready")
    {
        LineKind::Success
    } else if trimmed.starts_with("drwx") || trimmed.starts_with("-rw") || trimmed.starts_with("total ") {
        LineKind::Listing
    } else if trimmed.starts_with("remote:")
        || trimmed.starts_with("Receiving")
        || trimmed.starts_with("Resolving")
        || trimmed.starts_with("Cloning")
        || trimmed.ends_with("...")
    {
        LineKind::Process
    } else if trimmed.starts_with('"') {
        LineKind::Quote
    } else if is_shell_command(trimmed) {
        LineKind::Prompt
    } else {
        LineKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Instant;

    use crate::reveal::{Phase, RevealEvent};

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 19, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_hero_line_delays() {
        assert_eq!(hero_line_delay("import os"), ms(200));
        assert_eq!(hero_line_delay("from x import y"), ms(200));
        assert_eq!(hero_line_delay("$ cd ~/workspace"), ms(600));
        assert_eq!(hero_line_delay(">>> skills.top()"), ms(600));
        assert_eq!(hero_line_delay("['hero', 'skills']"), ms(800));
        assert_eq!(hero_line_delay("short line"), ms(300));
        assert_eq!(
            hero_line_delay("Portfolio server running at https://NazmulHassan.dev"),
            ms(400)
        );
    }

    #[test]
    fn test_skills_and_projects_delays() {
        assert_eq!(skills_line_delay("Analyzing skill proficiency..."), ms(800));
        assert_eq!(skills_line_delay(""), ms(300));
        assert_eq!(skills_line_delay("total 8"), ms(100));
        assert_eq!(projects_line_delay("Cloning into 'projects'..."), ms(800));
        assert_eq!(projects_line_delay("# Nazmul Hassan's Project Portfolio"), ms(800));
        assert_eq!(projects_line_delay("$ ls -la"), ms(600));
        assert_eq!(projects_line_delay(""), ms(300));
        assert_eq!(projects_line_delay("Resolving deltas"), ms(150));
    }

    #[test]
    fn test_philosophy_delays_and_sub_commands() {
        assert_eq!(philosophy_line_delay("# Title"), ms(800));
        assert_eq!(philosophy_line_delay("---"), ms(800));
        assert_eq!(philosophy_line_delay(""), ms(300));
        assert_eq!(philosophy_line_delay("Plain words"), ms(150));
        assert!(is_shell_command("cat principles.txt"));
        assert!(is_shell_command("clear"));
        assert!(!is_shell_command("category theory"));
        assert!(!is_shell_command(""));
    }

    #[test]
    fn test_hero_script_content() {
        let mut rng = StdRng::seed_from_u64(1);
        let script = script(TerminalKind::Hero, fixed_now(), &mut rng);
        assert_eq!(script.command, HERO_COMMAND);
        assert_eq!(script.lines.len(), 17);
        assert_eq!(script.lines[0], "[14:30:05] Initializing portfolio environment...");
        assert_eq!(script.lines[7], "→ Loaded 5 projects, 12 skills, 4 experience items");
        assert!(script.lines[9].starts_with("[INFO] Memory usage: "));
        assert_eq!(script.lines[16], "Portfolio ready at 14:30:05");
    }

    #[test]
    fn test_skills_listing() {
        let mut rng = StdRng::seed_from_u64(1);
        let script = script(TerminalKind::Skills, fixed_now(), &mut rng);
        assert_eq!(script.lines[1], "drwxr-xr-x  2 nazmul  staff  256 19 May 14:30 .");
        assert!(script.lines[3].starts_with("-rw-r--r--  1 nazmul  staff  "));
        assert!(script.lines[3].ends_with("19 May 14:30 python.skill"));
        assert_eq!(script.lines.len(), 3 + SKILLS.len() + 6);
        assert_eq!(
            script.lines.last().map(String::as_str),
            Some("Skills analysis complete. Displaying results:")
        );
    }

    #[test]
    fn test_projects_listing() {
        let mut rng = StdRng::seed_from_u64(1);
        let script = script(TerminalKind::Projects, fixed_now(), &mut rng);
        assert!(script
            .lines
            .iter()
            .any(|l| l.ends_with("eye-disease-classifier.project")));
        assert_eq!(
            script.lines.last().map(String::as_str),
            Some("Projects successfully loaded. Displaying portfolio...")
        );
    }

    #[test]
    fn test_every_terminal_runs_to_completion() {
        for kind in [
            TerminalKind::Hero,
            TerminalKind::Skills,
            TerminalKind::Projects,
            TerminalKind::Philosophy,
        ] {
            let mut rng = StdRng::seed_from_u64(3);
            let script = script(kind, fixed_now(), &mut rng);
            let n = script.lines.len();
            let mut reveal =
                ScriptedReveal::with_rng(script, pacing(kind), threshold(kind), StdRng::seed_from_u64(9));
            let t0 = Instant::now();
            reveal.start(t0);
            let events = reveal.advance(t0 + Duration::from_secs(300));
            let revealed = events
                .iter()
                .filter(|e| matches!(e, RevealEvent::LineRevealed { .. }))
                .count();
            assert_eq!(revealed, n, "{:?}", kind);
            assert_eq!(reveal.phase(), Phase::Done);
            assert!(reveal.has_completed());
        }
    }

    #[test]
    fn test_cv_output() {
        let lines = cv_output();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[4], "✔ CV created successfully: NazmulHassanResume.pdf");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("$ cd projects"), LineKind::Prompt);
        assert_eq!(classify(">>> render.portfolio()"), LineKind::PythonPrompt);
        assert_eq!(classify("['hero', 'skills']"), LineKind::Data);
        assert_eq!(classify("[INFO] Memory usage: 300MB"), LineKind::Status);
        assert_eq!(classify("# Engineering Philosophy"), LineKind::Heading);
        assert_eq!(classify("→ Connecting to PostgreSQL database..."), LineKind::Bullet);
        assert_eq!(classify("1. Build systems that explain themselves."), LineKind::Bullet);
        assert_eq!(classify("✔ CV created successfully: x.pdf"), LineKind::Success);
        assert_eq!(classify("drwxr-xr-x  2 nazmul"), LineKind::Listing);
        assert_eq!(classify("remote: Counting objects"), LineKind::Process);
        assert_eq!(classify("\"Make it work\""), LineKind::Quote);
        assert_eq!(classify("echo $APPROACH"), LineKind::Prompt);
        assert_eq!(classify("Research-minded, production-focused."), LineKind::Plain);
    }
}
