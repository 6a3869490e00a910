/// Content of an open file as the editor currently has it.
#[derive(Clone, Debug)]
pub struct TextDocument {
    content: String,
    version: i32,
}

impl TextDocument {
    #[must_use]
    pub fn new(content: String, version: i32) -> Self {
        Self { content, version }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }
}
