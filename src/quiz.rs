//! Demo quiz controller.
//!
//! An in-memory catalogue of tests stands in for persistent storage. Progress
//! travels in the query string (`user`, `score`) so every page is stateless.
//!
//! ```text
//! tests/index ──POST username,test_id──▶ tests/questions/<id>/1
//! tests/questions/<id>/<n> ──POST answer──▶ tests/questions/<id>/<n+1>
//!                                      └──▶ tests/results/?test_id=..&score=..
//! ```

use url::form_urlencoded;

use crate::app::{ActionError, ActionOutcome, BoundArgs, Controller, RequestContext, ViewData};
use crate::app::render::escape_html;
use crate::routing::UrlArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub answers: Vec<String>,
    /// Index into `answers`.
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizTest {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
}

impl QuizTest {
    /// Question by 1-based index.
    pub fn question(&self, index: usize) -> Option<&Question> {
        index.checked_sub(1).and_then(|i| self.questions.get(i))
    }
}

fn question(text: &str, answers: &[&str], correct: usize) -> Question {
    Question {
        text: text.to_owned(),
        answers: answers.iter().map(|a| (*a).to_owned()).collect(),
        correct,
    }
}

/// Controller behind `tests/...` URLs.
#[derive(Debug, Clone)]
pub struct TestsController {
    tests: Vec<QuizTest>,
}

impl TestsController {
    pub const NAME: &'static str = "TestsController";

    pub fn new(tests: Vec<QuizTest>) -> Self {
        Self { tests }
    }

    /// Small built-in catalogue used by the demo binary.
    pub fn sample() -> Self {
        Self::new(vec![
            QuizTest {
                id: "1".into(),
                name: "Rust basics".into(),
                questions: vec![
                    question("Which keyword declares an immutable binding?", &["var", "let", "const fn"], 1),
                    question("What does `?` do on an `Err`?", &["Panics", "Returns it early", "Ignores it"], 1),
                    question("Which type owns a heap string?", &["&str", "String", "char"], 1),
                ],
            },
            QuizTest {
                id: "2".into(),
                name: "HTTP".into(),
                questions: vec![
                    question("Which status means See Other?", &["301", "303", "307"], 1),
                    question("Which method should be idempotent?", &["PUT", "POST", "PATCH"], 0),
                ],
            },
        ])
    }

    pub fn tests(&self) -> &[QuizTest] {
        &self.tests
    }

    fn find(&self, id: &str) -> Option<&QuizTest> {
        self.tests.iter().find(|test| test.id == id)
    }

    fn index(&self, ctx: &RequestContext<'_>) -> Result<ActionOutcome, ActionError> {
        let mut error = None;

        if ctx.is_post() {
            match (ctx.non_empty_input("username"), ctx.non_empty_input("test_id")) {
                (None, _) => error = Some("User name cannot be empty"),
                (_, None) => error = Some("You must choose a test to proceed"),
                (Some(user), Some(test_id)) => match self.find(test_id) {
                    Some(test) => {
                        let args = [test.id.clone(), "1".to_owned()];
                        let query = progress_query(&[("user", user), ("score", "0")]);
                        let url = ctx
                            .router()
                            .build_url("", "questions", UrlArgs::from(&args[..]), &query)?;
                        return Ok(ActionOutcome::Redirect(url));
                    }
                    None => error = Some("Test does not exist"),
                },
            }
        }

        let selected = ctx.input("test_id").unwrap_or_default();
        let options: String = self
            .tests
            .iter()
            .map(|test| {
                format!(
                    "<option value=\"{}\"{}>{}</option>",
                    escape_html(&test.id),
                    if test.id == selected { " selected" } else { "" },
                    escape_html(&test.name)
                )
            })
            .collect();

        let mut data = ViewData::new();
        data.insert("page_title".into(), "Choose a test".into());
        data.insert("tests".into(), options.into());
        data.insert("username".into(), ctx.input("username").unwrap_or_default().into());
        data.insert("error".into(), error.unwrap_or_default().into());
        data.insert(
            "action".into(),
            ctx.router().build_url("", "index", UrlArgs::Reset, "")?.into(),
        );
        Ok(ActionOutcome::View(data))
    }

    fn questions(&self, args: &BoundArgs, ctx: &RequestContext<'_>) -> Result<ActionOutcome, ActionError> {
        let router = ctx.router();
        let home = || router.build_url("", "index", UrlArgs::Reset, "");

        let Some(test) = args.get("test_id").and_then(|id| self.find(id)) else {
            return Ok(ActionOutcome::Redirect(home()?));
        };
        let index: usize = args
            .get("question_idx")
            .and_then(|idx| idx.parse().ok())
            .unwrap_or(0);
        let Some(current) = test.question(index) else {
            return Ok(ActionOutcome::Redirect(home()?));
        };

        let user = ctx.input("user").unwrap_or_default();
        let score: usize = ctx.input("score").and_then(|s| s.parse().ok()).unwrap_or(0);
        let mut error = "";

        if ctx.is_post() {
            match ctx.input("answer").and_then(|a| a.parse::<usize>().ok()) {
                Some(answer) if answer < current.answers.len() => {
                    let score = (score + usize::from(answer == current.correct)).to_string();
                    let url = if index < test.questions.len() {
                        let next = [test.id.clone(), (index + 1).to_string()];
                        let query = progress_query(&[("user", user), ("score", score.as_str())]);
                        router.build_url("", "", UrlArgs::from(&next[..]), &query)?
                    } else {
                        let query = progress_query(&[("test_id", test.id.as_str()), ("user", user), ("score", score.as_str())]);
                        router.build_url("", "results", UrlArgs::Reset, &query)?
                    };
                    return Ok(ActionOutcome::Redirect(url));
                }
                _ => error = "Choose one of the answers",
            }
        }

        let answers: String = current
            .answers
            .iter()
            .enumerate()
            .map(|(i, answer)| {
                format!(
                    "<label><input type=\"radio\" name=\"answer\" value=\"{i}\"> {}</label>",
                    escape_html(answer)
                )
            })
            .collect();

        let mut data = ViewData::new();
        data.insert("page_title".into(), test.name.clone().into());
        data.insert("question".into(), current.text.clone().into());
        data.insert("answers".into(), answers.into());
        data.insert("progress".into(), format!("{index} / {}", test.questions.len()).into());
        data.insert("user".into(), user.into());
        data.insert("score".into(), score.into());
        data.insert("error".into(), error.into());
        let query = match router.query() {
            "" => String::new(),
            query => format!("?{query}"),
        };
        data.insert(
            "action".into(),
            router.build_url("", "", UrlArgs::Inherit, &query)?.into(),
        );
        Ok(ActionOutcome::View(data))
    }

    fn results(&self, ctx: &RequestContext<'_>) -> Result<ActionOutcome, ActionError> {
        let router = ctx.router();
        let Some(test) = ctx.input("test_id").and_then(|id| self.find(id)) else {
            return Ok(ActionOutcome::Redirect(router.build_url("", "index", UrlArgs::Reset, "")?));
        };

        let total = test.questions.len();
        let score = ctx
            .input("score")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0)
            .min(total);

        let mut data = ViewData::new();
        data.insert("page_title".into(), format!("Results: {}", test.name).into());
        data.insert("user".into(), ctx.input("user").unwrap_or_default().into());
        data.insert("score".into(), score.into());
        data.insert("total".into(), total.into());
        data.insert(
            "restart".into(),
            router.build_url("", "index", UrlArgs::Reset, "")?.into(),
        );
        Ok(ActionOutcome::View(data))
    }

    fn errors(&self, ctx: &RequestContext<'_>) -> Result<ActionOutcome, ActionError> {
        let mut data = ViewData::new();
        data.insert("page_title".into(), "Something went wrong".into());
        data.insert(
            "message".into(),
            ctx.non_empty_input("message")
                .unwrap_or("The page you requested is not available.")
                .into(),
        );
        data.insert(
            "back".into(),
            ctx.router().build_url("", "index", UrlArgs::Reset, "")?.into(),
        );
        Ok(ActionOutcome::View(data))
    }
}

impl Controller for TestsController {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn invoke(
        &self,
        action: &str,
        args: &BoundArgs,
        ctx: &RequestContext<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        match action {
            "index" => self.index(ctx),
            "questions" => self.questions(args, ctx),
            "results" => self.results(ctx),
            "errors" => self.errors(ctx),
            other => Err(ActionError::NotImplemented {
                controller: Self::NAME.to_owned(),
                action: other.to_owned(),
            }),
        }
    }
}

/// `?k=v&...` with form encoding.
fn progress_query(pairs: &[(&str, &str)]) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("?{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_one_based() {
        let controller = TestsController::sample();
        let test = &controller.tests()[0];
        assert!(test.question(0).is_none());
        assert_eq!(test.question(1), test.questions.first());
        assert!(test.question(test.questions.len() + 1).is_none());
    }

    #[test]
    fn test_sample_answers_are_in_range() {
        for test in TestsController::sample().tests() {
            for q in &test.questions {
                assert!(q.correct < q.answers.len(), "{}", q.text);
            }
        }
    }

    #[test]
    fn test_progress_query_encodes() {
        assert_eq!(
            progress_query(&[("user", "Ann Lee"), ("score", "2")]),
            "?user=Ann+Lee&score=2"
        );
    }
}
