#[cfg(test)]
mod tests {
    use crate::llm::{anthropic, openai_compat};
    use crate::shell::ProcessShell;
    use crate::tools::*;
    use agent_core::dynamic::parse_dynamic_tools;
    use agent_core::ports::{ChatRequest, ShellPort};
    use agent_core::{Tool, ToolRegistry};
    use agent_types::message::{ContentBlock, Message, Role};
    use agent_types::tool::{CommandResult, InputSchema, ToolDefinition, ToolOutcome};
    use agent_types::ToolError;
    use serde_json::{json, Value};
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn root_str(dir: &TempDir) -> String {
        dir.path().to_string_lossy().into_owned()
    }

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    async fn list(input: Value) -> Vec<String> {
        let out = ListFilesTool::new().call(input).await.unwrap();
        serde_json::from_str(&out).unwrap()
    }

    async fn grep(input: Value) -> Vec<GrepMatch> {
        let out = GrepTool::new().call(input).await.unwrap();
        if out == NO_MATCHES {
            return Vec::new();
        }
        serde_json::from_str(&out).unwrap()
    }

    // ─── read_file ───────────────────────────────────────────

    #[tokio::test]
    async fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "notes.txt", "hello\nworld\n");
        let path = dir.path().join("notes.txt");

        let out = ReadFileTool::new()
            .call(json!({ "path": path.to_string_lossy() }))
            .await
            .unwrap();
        assert_eq!(out, "hello\nworld\n");
    }

    #[tokio::test]
    async fn test_read_file_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ReadFileTool::new();

        let missing = dir.path().join("absent.txt");
        let err = tool
            .call(json!({ "path": missing.to_string_lossy() }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Fs { .. }));

        let err = tool.call(json!({ "path": root_str(&dir) })).await.unwrap_err();
        assert!(matches!(err, ToolError::Fs { .. }));
    }

    #[tokio::test]
    async fn test_read_file_requires_path() {
        let err = ReadFileTool::new().call(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    // ─── edit_file ───────────────────────────────────────────

    #[tokio::test]
    async fn test_edit_file_replaces_all_occurrences() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", "foo bar foo");
        let path = dir.path().join("a.txt");

        let out = EditFileTool::new()
            .call(json!({ "path": path.to_string_lossy(), "old_str": "foo", "new_str": "baz" }))
            .await
            .unwrap();
        assert_eq!(out, "OK");
        assert_eq!(fs::read_to_string(&path).unwrap(), "baz bar baz");
    }

    #[tokio::test]
    async fn test_edit_file_no_match_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", "line one\nline two\n");
        let path = dir.path().join("a.txt");
        let before = fs::read(&path).unwrap();

        let err = EditFileTool::new()
            .call(json!({ "path": path.to_string_lossy(), "old_str": "three", "new_str": "3" }))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::NoMatch);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_edit_file_creates_missing_file_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/er/new.txt");
        let path_str = path.to_string_lossy().into_owned();

        let out = EditFileTool::new()
            .call(json!({ "path": path_str, "old_str": "", "new_str": "fresh\ncontent" }))
            .await
            .unwrap();
        assert_eq!(out, format!("Successfully created file {}", path_str));
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\ncontent");
    }

    #[tokio::test]
    async fn test_edit_file_invalid_inputs() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", "content");
        let path = dir.path().join("a.txt");
        let tool = EditFileTool::new();

        let err = tool
            .call(json!({ "path": "", "old_str": "a", "new_str": "b" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        let err = tool
            .call(json!({ "path": path.to_string_lossy(), "old_str": "x", "new_str": "x" }))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::NoOpEdit);

        // Empty old_str only creates; it never edits an existing file
        let err = tool
            .call(json!({ "path": path.to_string_lossy(), "old_str": "", "new_str": "new" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    // ─── list_files ──────────────────────────────────────────

    fn sample_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", "foo\nbar\n");
        write(&dir, "src/main.rs", "fn main() {}\n");
        write(&dir, ".hidden/b.txt", "foo\n");
        write(&dir, ".git/HEAD", "ref: refs/heads/main\n");
        write(&dir, "node_modules/pkg/index.js", "foo\n");
        dir
    }

    #[tokio::test]
    async fn test_list_files_defaults() {
        let dir = sample_tree();
        let files = list(json!({ "path": root_str(&dir) })).await;
        assert_eq!(files, vec!["a.txt", "src/", "src/main.rs"]);
    }

    #[tokio::test]
    async fn test_list_files_include_hidden_and_git() {
        let dir = sample_tree();
        let files = list(json!({
            "path": root_str(&dir),
            "include_hidden": true,
            "include_git": true,
        }))
        .await;
        assert_eq!(
            files,
            vec![".git/", ".git/HEAD", ".hidden/", ".hidden/b.txt", "a.txt", "src/", "src/main.rs"]
        );
    }

    #[tokio::test]
    async fn test_list_files_never_reports_node_modules() {
        let dir = sample_tree();
        for (git, hidden) in [(false, false), (true, false), (false, true), (true, true)] {
            let files = list(json!({
                "path": root_str(&dir),
                "include_git": git,
                "include_hidden": hidden,
            }))
            .await;
            assert!(
                files.iter().all(|f| !f.starts_with("node_modules")),
                "node_modules listed with git={} hidden={}",
                git,
                hidden
            );
        }
    }

    #[tokio::test]
    async fn test_list_files_custom_exclude_replaces_defaults() {
        let dir = sample_tree();
        let files = list(json!({ "path": root_str(&dir), "exclude": ["src"] })).await;
        assert_eq!(
            files,
            vec!["a.txt", "node_modules/", "node_modules/pkg/", "node_modules/pkg/index.js"]
        );
    }

    #[tokio::test]
    async fn test_list_files_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = ListFilesTool::new()
            .call(json!({ "path": missing.to_string_lossy() }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Fs { .. }));
    }

    // ─── grep ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_grep_default_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "a.txt", "foo\nbar");
        write(&dir, ".hidden/b.txt", "foo");

        let matches = grep(json!({ "pattern": "foo", "path": root_str(&dir) })).await;
        assert_eq!(
            matches,
            vec![GrepMatch {
                file: "a.txt".to_string(),
                line: 1,
                content: "foo".to_string(),
            }]
        );

        let matches = grep(json!({
            "pattern": "foo",
            "path": root_str(&dir),
            "include_hidden": true,
        }))
        .await;
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].file, ".hidden/b.txt");
        assert_eq!(matches[1].file, "a.txt");
    }

    #[tokio::test]
    async fn test_grep_line_numbers_and_regex() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "code.rs", "fn one() {}\nlet x = 1;\nfn two() {}\n");

        let matches = grep(json!({ "pattern": r"^fn \w+", "path": root_str(&dir) })).await;
        let lines: Vec<usize> = matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(matches[1].content, "fn two() {}");
    }

    #[tokio::test]
    async fn test_grep_skips_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), b"\0foo\nfoo").unwrap();
        write(&dir, "text.txt", "no match here");

        let out = GrepTool::new()
            .call(json!({ "pattern": "foo", "path": root_str(&dir) }))
            .await
            .unwrap();
        assert_eq!(out, NO_MATCHES);
    }

    #[tokio::test]
    async fn test_grep_errors() {
        let dir = tempfile::tempdir().unwrap();
        let tool = GrepTool::new();

        let err = tool.call(json!({ "pattern": "" })).await.unwrap_err();
        assert_eq!(err, ToolError::EmptyPattern);

        let err = tool
            .call(json!({ "pattern": "(unclosed", "path": root_str(&dir) }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidPattern(_)));

        let missing = dir.path().join("nope");
        let err = tool
            .call(json!({ "pattern": "x", "path": missing.to_string_lossy() }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Fs { .. }));
    }

    // ─── execute ─────────────────────────────────────────────

    fn shell() -> Rc<dyn ShellPort> {
        Rc::new(ProcessShell::new())
    }

    async fn execute(input: Value) -> Result<CommandResult, ToolError> {
        let out = ExecuteTool::new(shell()).call(input).await?;
        Ok(serde_json::from_str(&out).unwrap())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_captures_output() {
        let result = execute(json!({ "command": "echo out; echo err >&2" })).await.unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_nonzero_exit_is_success() {
        let result = execute(json!({ "command": "exit 3" })).await.unwrap();
        assert_eq!(result.exit_code, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_timeout() {
        let started = std::time::Instant::now();
        let err = execute(json!({ "command": "sleep 5", "timeout": 1 })).await.unwrap_err();
        assert_eq!(err, ToolError::Timeout(1));
        assert!(started.elapsed() < std::time::Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_timeout_kills_background_jobs() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let command = format!("(sleep 2; touch '{}') & wait", marker.display());

        let err = execute(json!({ "command": command, "timeout": 1 })).await.unwrap_err();
        assert_eq!(err, ToolError::Timeout(1));

        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
        assert!(!marker.exists(), "background job outlived the deadline");
    }

    #[tokio::test]
    async fn test_execute_empty_command() {
        let err = execute(json!({ "command": "   " })).await.unwrap_err();
        assert_eq!(err, ToolError::EmptyCommand);
    }

    // ─── Registry composition ────────────────────────────────

    #[test]
    fn test_builtin_tool_names() {
        let tools = builtin_tools(shell());
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["read_file", "list_files", "edit_file", "grep", "execute"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_builtins_and_dynamic_tools_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register_all(builtin_tools(shell())).unwrap();

        let config = r#"{"tools": [
            {"name": "greet", "command": "echo hello {{who}}",
             "parameters": [{"name": "who", "required": true}]},
            {"name": "today", "command": "echo today"}
        ]}"#;
        let dynamic = parse_dynamic_tools(config, shell()).unwrap();
        assert_eq!(agent_core::dynamic::register_dynamic_tools(&mut registry, dynamic), 2);
        assert_eq!(registry.len(), 7);

        let out = registry.dispatch("greet", json!({ "who": "world" })).await.unwrap();
        let result: CommandResult = serde_json::from_str(&out).unwrap();
        assert_eq!(result.stdout, "hello world\n");

        let err = registry.dispatch("greet", json!({})).await.unwrap_err();
        assert_eq!(err, ToolError::MissingParameter("who".to_string()));
        assert!(registry.dispatch("today", json!({})).await.is_ok());
    }

    // ─── LLM adapters ────────────────────────────────────────

    fn sample_request() -> ChatRequest {
        ChatRequest {
            model: "test-model".to_string(),
            max_tokens: 256,
            system: Some("be brief".to_string()),
            messages: vec![
                Message::user("list files"),
                Message::assistant_blocks(vec![
                    ContentBlock::Text { text: "Sure".to_string() },
                    ContentBlock::ToolUse {
                        id: "call_1".to_string(),
                        name: "list_files".to_string(),
                        input: json!({ "path": "." }),
                    },
                ]),
                Message::tool_results(vec![ToolOutcome::success("call_1", "[\"a.txt\"]")]),
            ],
            tools: vec![ToolDefinition {
                name: "list_files".to_string(),
                description: "List files".to_string(),
                input_schema: InputSchema::object().property("path", "string", "Path", false),
            }],
        }
    }

    #[test]
    fn test_anthropic_request_body() {
        let body = anthropic::AnthropicProvider::build_request_body(&sample_request()).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"][1]["content"][1]["type"], "tool_use");
        assert_eq!(body["messages"][2]["role"], "user");
        assert_eq!(body["messages"][2]["content"][0]["type"], "tool_result");
        assert_eq!(body["messages"][2]["content"][0]["tool_use_id"], "call_1");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
    }

    #[test]
    fn test_anthropic_response_drops_unknown_blocks() {
        let data: anthropic::ApiResponse = serde_json::from_value(json!({
            "content": [
                { "type": "thinking", "thinking": "hmm", "signature": "x" },
                { "type": "text", "text": "Let me look." },
                { "type": "tool_use", "id": "toolu_1", "name": "grep", "input": { "pattern": "fn" } }
            ],
            "stop_reason": "tool_use",
            "usage": { "input_tokens": 12, "output_tokens": 7 }
        }))
        .unwrap();

        let response = anthropic::parse_response(data);
        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.message.content.len(), 2);
        assert_eq!(response.message.text(), "Let me look.");
        assert_eq!(response.message.tool_calls()[0].name, "grep");
        assert_eq!(response.stop_reason.as_deref(), Some("tool_use"));
        assert_eq!(response.usage.map(|u| u.output_tokens), Some(7));
    }

    #[test]
    fn test_openai_request_body() {
        let body = openai_compat::OpenAiCompatProvider::build_request_body(&sample_request());
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "list files");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["tool_calls"][0]["function"]["name"], "list_files");
        assert_eq!(
            messages[2]["tool_calls"][0]["function"]["arguments"],
            "{\"path\":\".\"}"
        );
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_1");
        assert_eq!(body["tools"][0]["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_openai_request_keeps_blank_user_turn() {
        let mut req = sample_request();
        req.messages.push(Message::assistant("Found a.txt"));
        req.messages.push(Message::user(""));
        req.messages.push(Message::assistant("Anything else?"));

        let body = openai_compat::OpenAiCompatProvider::build_request_body(&req);
        let messages = body["messages"].as_array().unwrap();
        let roles: Vec<&str> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(
            roles,
            ["system", "user", "assistant", "tool", "assistant", "user", "assistant"]
        );
        assert_eq!(messages[5]["content"], "");
    }

    #[test]
    fn test_openai_response_mapping() {
        let data: openai_compat::ApiResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": { "name": "execute", "arguments": "{\"command\":\"ls\"}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": { "prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7 }
        }))
        .unwrap();

        let response = openai_compat::parse_response(data).unwrap();
        assert_eq!(
            response.message.content,
            vec![ContentBlock::ToolUse {
                id: "call_9".to_string(),
                name: "execute".to_string(),
                input: json!({ "command": "ls" }),
            }]
        );
        assert_eq!(response.usage.map(|u| u.input_tokens), Some(3));
    }

    #[test]
    fn test_openai_response_without_choices() {
        let data: openai_compat::ApiResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(openai_compat::parse_response(data).is_err());
    }
}
