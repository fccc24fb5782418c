//! Static portfolio content.

pub const OWNER: &str = "Nazmul Hassan";
pub const TAGLINE: &str = "Building intelligent systems from data to deployment.";

pub const ROLES: &[&str] = &[
    "Software Engineer",
    "Back End Developer",
    "Machine Learning Engineer",
    "AI Agent Developer",
];

pub const CV_FILE: &str = "NazmulHassanResume.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    Languages,
    AiData,
    Engineering,
}

impl SkillCategory {
    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::Languages => "languages",
            SkillCategory::AiData => "ai & data",
            SkillCategory::Engineering => "engineering",
        }
    }
}

pub struct Skill {
    pub name: &'static str,
    pub level: u8,
    pub category: SkillCategory,
}

pub const SKILLS: &[Skill] = &[
    Skill { name: "Python", level: 95, category: SkillCategory::Languages },
    Skill { name: "TypeScript", level: 85, category: SkillCategory::Languages },
    Skill { name: "Go", level: 75, category: SkillCategory::Languages },
    Skill { name: "Machine Learning", level: 90, category: SkillCategory::AiData },
    Skill { name: "Natural Language Processing", level: 85, category: SkillCategory::AiData },
    Skill { name: "Backend Development", level: 90, category: SkillCategory::Engineering },
    Skill { name: "Database Management", level: 85, category: SkillCategory::Engineering },
    Skill { name: "Frontend Development", level: 80, category: SkillCategory::Engineering },
    Skill { name: "DevOps & Cloud", level: 75, category: SkillCategory::Engineering },
    Skill { name: "Data Engineering", level: 80, category: SkillCategory::AiData },
    Skill { name: "Version Control", level: 85, category: SkillCategory::Engineering },
    Skill { name: "Software Engineering Practices", level: 80, category: SkillCategory::Engineering },
];

pub struct Project {
    pub name: &'static str,
    pub summary: &'static str,
    pub stack: &'static [&'static str],
}

pub const PROJECTS: &[Project] = &[
    Project {
        name: "Eye Disease Classifier",
        summary: "CNN that grades retinal fundus images into four disease classes.",
        stack: &["Python", "TensorFlow", "OpenCV"],
    },
    Project {
        name: "Fraud Detection System",
        summary: "Gradient-boosted transaction scoring with drift monitoring.",
        stack: &["Python", "XGBoost", "PostgreSQL"],
    },
    Project {
        name: "Plant Disease Detection",
        summary: "Leaf image classifier served behind a lightweight REST API.",
        stack: &["PyTorch", "FastAPI", "Docker"],
    },
    Project {
        name: "Custom CRM System",
        summary: "Multi-tenant CRM with role-based access and reporting.",
        stack: &["Django", "React", "PostgreSQL"],
    },
    Project {
        name: "AI Content Detection",
        summary: "Transformer ensemble that flags machine-generated text.",
        stack: &["Python", "Transformers", "scikit-learn"],
    },
];

pub struct Experience {
    pub role: &'static str,
    pub company: &'static str,
    pub period: &'static str,
    pub summary: &'static str,
}

pub const EXPERIENCE: &[Experience] = &[
    Experience {
        role: "Software Engineer",
        company: "Independent",
        period: "2023 - present",
        summary: "Backend services and AI agents for small product teams.",
    },
    Experience {
        role: "Machine Learning Engineer",
        company: "Research Project",
        period: "2022 - 2023",
        summary: "Medical imaging models from data pipeline to evaluation.",
    },
    Experience {
        role: "Backend Developer",
        company: "Freelance",
        period: "2020 - 2022",
        summary: "APIs, databases and deployment for client web platforms.",
    },
    Experience {
        role: "MSc Data Science",
        company: "University, London",
        period: "2021 - 2022",
        summary: "Machine learning, statistics and data engineering.",
    },
];

pub struct ContactInfo {
    pub email: &'static str,
    pub linkedin: &'static str,
    pub github: &'static str,
    pub website: &'static str,
    pub location: &'static str,
    pub availability: &'static str,
}

pub const CONTACT: ContactInfo = ContactInfo {
    email: "nazmul.naaz96@gmail.com",
    linkedin: "linkedin.com/in/nhassan96",
    github: "github.com/HassanNazmul",
    website: "nazmulhassan.dev",
    location: "London, United Kingdom",
    availability: "Open to new opportunities",
};

/// Lowercase, with every run of non-alphanumerics collapsed to one `-`.
pub fn kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
