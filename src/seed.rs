//! Built-in defaults used whenever a record has never been saved

use crate::models::{Course, Credential, Lesson, Module, Question, Quiz, User, VisualConfig};
use crate::types::Role;

/// Id of the seeded administrator
pub const ADMIN_ID: &str = "admin";

const DEFAULT_PASSING_SCORE: u32 = 70;

pub fn default_visual() -> VisualConfig {
    VisualConfig {
        logo_url: "https://example.com/assets/logo.svg".to_string(),
        primary_color: "#0f172a".to_string(),
        background_color: "#f8fafc".to_string(),
    }
}

pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: ADMIN_ID.to_string(),
            username: "admin".to_string(),
            password: Credential::new("123"),
            display_name: "Master Administrator".to_string(),
            role: Role::Admin,
        },
        User {
            id: "adv1".to_string(),
            username: "student".to_string(),
            password: Credential::new("123"),
            display_name: "Jordan Silva".to_string(),
            role: Role::Student,
        },
    ]
}

fn lesson(id: &str, order: u32, title: &str, content: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        order,
        title: title.to_string(),
        content: content.to_string(),
        video_url: None,
        image_url: None,
    }
}

fn question(id: &str, text: &str, options: [&str; 4], correct_answer: usize) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
    }
}

fn quiz(id: &str, module_id: &str, questions: Vec<Question>) -> Quiz {
    Quiz {
        id: id.to_string(),
        module_id: module_id.to_string(),
        passing_score: DEFAULT_PASSING_SCORE,
        questions,
    }
}

pub fn default_course() -> Course {
    Course {
        title: "Complete Guide: Growing a Law Practice".to_string(),
        modules: vec![
            Module {
                id: "m1".to_string(),
                order: 1,
                title: "Sales Strategy for Lawyers".to_string(),
                summary: "Structure a sales process that fits legal services.".to_string(),
                lessons: vec![
                    lesson("m1l1", 1, "Identifying your audience", "Every successful sale starts with knowing who you are talking to. A clear ideal client profile saves the firm time and money."),
                    lesson("m1l2", 2, "Building relationships with leads", "Legal work is bought on trust. Nurture contacts with useful expertise before asking for the engagement."),
                    lesson("m1l3", 3, "Persuasion and argument", "Persuasion is not manipulation. Social proof and demonstrated authority show the client that inaction costs more than counsel."),
                    lesson("m1l4", 4, "Closing the engagement", "Present the fee proposal so that perceived value clearly outweighs the number on the page."),
                    lesson("m1l5", 5, "Follow-up strategy", "Few engagements close on first contact. A structured follow-up routine lifts conversion substantially."),
                ],
                quiz: quiz("q1", "m1", vec![
                    question("q1_1", "What does ICP stand for?", ["Internal Client Process", "Ideal Customer Profile", "Index of Case Pricing", "Initial Contact Plan"], 1),
                    question("q1_2", "Legal sales are built on:", ["Low prices", "Pressure", "Trust and authority", "Speed alone"], 2),
                    question("q1_3", "Follow-up should be:", ["Avoided", "Phone only", "Structured and useful", "Done once"], 2),
                    question("q1_4", "Persuasion in legal services focuses on:", ["Misleading the court", "Demonstrating expertise", "Hiding fees", "Promising wins"], 1),
                    question("q1_5", "The biggest audience mistake is:", ["Segmenting too much", "Trying to serve everyone", "Using email", "Having a website"], 1),
                ]),
            },
            Module {
                id: "m2".to_string(),
                order: 2,
                title: "Digital Marketing for Lawyers".to_string(),
                summary: "Use digital channels to attract new clients.".to_string(),
                lessons: vec![
                    lesson("m2l1", 1, "Creating relevant content", "Legal marketing is content marketing. You attract with knowledge and keep clients with trust."),
                    lesson("m2l2", 2, "Website and search optimisation", "Being found in search is the most durable passive channel. Learn to target intent-driven keywords."),
                    lesson("m2l3", 3, "Email newsletters", "The most direct channel you own. Informative newsletters keep the firm front of mind."),
                    lesson("m2l4", 4, "Social networks", "Professional networks for business clients, consumer networks for individuals. Each needs its own voice."),
                    lesson("m2l5", 5, "Paid search and ads", "Spend carefully and measure return while respecting professional advertising rules."),
                ],
                quiz: quiz("q2", "m2", vec![
                    question("q2_1", "What is SEO?", ["Online Error System", "Search Engine Optimization", "Seal of Efficient Offices", "Social Engine Order"], 1),
                    question("q2_2", "Best network for corporate networking?", ["Short video apps", "Photo apps", "Professional networks", "Forums"], 2),
                    question("q2_3", "Legal marketing should be:", ["Aggressive", "Informative", "Misleading", "Radio only"], 1),
                    question("q2_4", "Paid search reaches people who:", ["Are already looking for a solution", "Are just browsing", "Want entertainment", "Are offline"], 0),
                    question("q2_5", "Email marketing is for:", ["Spreading malware", "Nurturing relationships", "Mass spam", "Nothing"], 1),
                ]),
            },
            Module {
                id: "m3".to_string(),
                order: 3,
                title: "Client Relationship Management".to_string(),
                summary: "Keep strong, lasting relationships with your clients.".to_string(),
                lessons: vec![
                    lesson("m3l1", 1, "Service and after-sales support", "The client journey does not end with the judgment. Referrals are born after the case closes."),
                    lesson("m3l2", 2, "Feedback and client scoring", "Net Promoter Score predicts how the firm will grow. Measure it and act on it."),
                    lesson("m3l3", 3, "Building a referral network", "Referrals are a process, not luck. Ask for them at the right moment."),
                    lesson("m3l4", 4, "Loyalty and lifetime value", "Keep clients coming back across practice areas to raise lifetime value."),
                    lesson("m3l5", 5, "Resolving conflicts and retention", "An unhappy client who is heard and helped often becomes the most loyal one."),
                ],
                quiz: quiz("q3", "m3", vec![
                    question("q3_1", "What does NPS measure?", ["Net profit", "Satisfaction and referral intent", "Case speed", "Headcount"], 1),
                    question("q3_2", "A promoter is a client who:", ["Does not pay", "Stays silent", "Actively refers the firm", "Switches lawyers"], 2),
                    question("q3_3", "Keeping a client is:", ["Impossible", "Costlier than winning one", "Cheaper than winning a new one", "Irrelevant"], 2),
                    question("q3_4", "LTV means:", ["Low Time Value", "Long Term Vision", "Lifetime Value", "Legal Title View"], 2),
                    question("q3_5", "A referral network should be:", ["Left to luck", "A structured process", "Unlawful", "Family only"], 1),
                ]),
            },
        ],
    }
}
