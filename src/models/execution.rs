/// Fully resolved target of a remote exec call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub namespace: String,
    pub pod: String,
    pub container: String,
    pub argv: Vec<String>,
}

impl std::fmt::Display for ExecutionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} [{}]: {}",
            self.namespace,
            self.pod,
            self.container,
            self.argv.join(" ")
        )
    }
}
