use redimg::{Enrichment, FetchOutcome, PageFetcher, QueryTarget, ReverseImageSearch, TableRow};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Scripted fetcher: per subreddit, a queue of outcomes popped one per
/// request. Every request URL is recorded so tests can assert which
/// targets were actually issued (and in what order).
pub struct ScriptedFetcher {
    outcomes: RefCell<HashMap<String, VecDeque<FetchOutcome>>>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            outcomes: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn script<I>(self, subreddit: &str, outcomes: I) -> Self
    where
        I: IntoIterator<Item = FetchOutcome>,
    {
        self.outcomes
            .borrow_mut()
            .insert(subreddit.to_string(), outcomes.into_iter().collect());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn call_url(&self, idx: usize) -> String {
        self.calls.borrow()[idx].clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&self, target: &QueryTarget) -> FetchOutcome {
        self.calls.borrow_mut().push(target.url.clone());
        self.outcomes
            .borrow_mut()
            .get_mut(&target.subreddit)
            .and_then(|q| q.pop_front())
            .unwrap_or(FetchOutcome::NotFound)
    }
}

/// Enricher returning a fixed result; looked-up URLs are shared out so the
/// caller can still inspect them after the enricher moved into the run.
pub struct StubEnricher {
    result: Enrichment,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl StubEnricher {
    pub fn empty() -> (Self, Rc<RefCell<Vec<String>>>) {
        Self::returning(Enrichment::default())
    }

    pub fn returning(result: Enrichment) -> (Self, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (Self { result, calls: calls.clone() }, calls)
    }
}

impl ReverseImageSearch for StubEnricher {
    fn lookup(&mut self, image_url: &str) -> Enrichment {
        self.calls.borrow_mut().push(image_url.to_string());
        self.result.clone()
    }
}

/// A fully populated image child as the listing API returns it.
pub fn image_child(post_id: &str, subreddit_id: &str, ups: i64, num_comments: i64) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "post_hint": "image",
            "title": "a cute cat",
            "id": post_id,
            "subreddit_id": subreddit_id,
            "subreddit_name_prefixed": "r/pics",
            "subreddit_subscribers": 1234,
            "ups": ups,
            "gildings": {},
            "num_comments": num_comments,
            "domain": "i.redd.it",
            "url": format!("https://i.redd.it/{post_id}.jpg"),
            "permalink": format!("/r/pics/comments/{post_id}/"),
            "created_utc": 1_700_000_000.0_f64,
        }
    })
}

/// A listing body wrapping the given children, shaped like the real API.
pub fn listing_body(children: Vec<Value>) -> Value {
    json!({ "kind": "Listing", "data": { "children": children } })
}

/// Table names of a row-set, in emission order.
pub fn table_names(rows: &[TableRow]) -> Vec<&'static str> {
    rows.iter().map(|r| r.table.name()).collect()
}

/// Look up a field value in a row by column name.
pub fn field<'a>(row: &'a TableRow, name: &str) -> &'a redimg::Field {
    &row.fields
        .iter()
        .find(|(n, _)| *n == name)
        .unwrap_or_else(|| panic!("no field {name}"))
        .1
}
