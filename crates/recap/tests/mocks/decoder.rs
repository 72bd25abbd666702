use recap::DocumentDecoder;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockDecoder {
    pub pages: Vec<String>,
    pub calls: Arc<Mutex<Vec<usize>>>,
    pub fail_with: Option<String>,
}

impl MockDecoder {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            pages: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl DocumentDecoder for MockDecoder {
    type Error = anyhow::Error;

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
        self.calls.lock().unwrap().push(bytes.len());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.pages.clone())
    }
}
