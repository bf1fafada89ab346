use futures_util::StreamExt;
use llm_wire::chat::{ChatMessage, ContentItem, CreateChatRequest, FinishReason};
use llm_wire::responses::{
    CreateResponseRequest, ListParams, ResponseInput, ResponseInputItem, ToolOutput,
};
use llm_wire::tool::Tool;
use llm_wire::transport::{Api, Configuration};
use llm_wire::{Client, Error};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    let configuration = Configuration::new("test-key").with_api(Api::parse(&server.uri()).unwrap());
    Client::new(configuration).unwrap()
}

#[tokio::test]
async fn test_chat_tool_call_round_trip() {
    let server = MockServer::start().await;

    // First turn: the model asks for a tool.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "user", "content": [
                { "type": "text", "text": "What's in this picture?" },
                {
                    "type": "image_url",
                    "image_url": { "url": "data:image/png;base64,iVBORw0KGgo=" }
                }
            ]}],
            "tools": [{ "type": "function", "function": { "name": "describe_image" } }],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1743556966,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_img",
                        "type": "function",
                        "function": {
                            "name": "describe_image",
                            "arguments": "{\"detail\":\"low\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": { "prompt_tokens": 50, "completion_tokens": 10, "total_tokens": 60 }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut messages = vec![ChatMessage::user(vec![
        ContentItem::text("What's in this picture?"),
        ContentItem::image(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], "png"),
    ])];
    let mut request = CreateChatRequest::new("gpt-4o", messages.clone());
    request.tools = vec![Tool::function(
        "describe_image",
        "Describe the attached image",
        json!({ "type": "object", "properties": { "detail": { "type": "string" } } }),
    )];

    let chat = client.chats.create(&request).await.unwrap();
    assert_eq!(chat.choices[0].finish_reason, Some(FinishReason::ToolCalls));
    let assistant = chat.first_message().unwrap().clone();
    let call = assistant.tool_calls()[0].clone();
    assert_eq!(call.function.name, "describe_image");

    // Second turn: replay the tool-call turn plus our answer.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {},
                { "role": "assistant", "content": "", "tool_calls": [{ "id": "call_img" }] },
                { "role": "tool", "tool_call_id": "call_img", "content": "a PNG signature" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-2",
            "created": 1743556970,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "It's just a PNG header." },
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    messages.push(assistant);
    messages.push(ChatMessage::tool("a PNG signature", &call.id));
    request.messages = messages;

    let chat = client.chats.create(&request).await.unwrap();
    assert_eq!(chat.first_text().as_deref(), Some("It's just a PNG header."));
}

#[tokio::test]
async fn test_chat_stream() {
    let server = MockServer::start().await;
    let chunk = |content: &str| {
        json!({
            "id": "chatcmpl-3",
            "object": "chat.completion.chunk",
            "created": 1743556966,
            "model": "gpt-4o",
            "choices": [{ "index": 0, "delta": { "content": content }, "finish_reason": null }]
        })
    };
    let body = format!(
        "data: {}\n\ndata: {}\n\ndata: [DONE]\n\n",
        chunk("Hel"),
        chunk("lo")
    );

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let request = CreateChatRequest::new("gpt-4o", vec![ChatMessage::user("Say hello")]);
    let mut stream = client(&server).chats.stream(&request).await.unwrap();

    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        text.push_str(chunk.unwrap().delta_text().unwrap_or_default());
    }
    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn test_responses_function_call_loop() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(body_partial_json(json!({ "input": "Weather in Lima?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp_1",
            "object": "response",
            "created_at": 1743556966,
            "status": "completed",
            "model": "gpt-4.1",
            "output": [{
                "id": "fc_1",
                "type": "function_call",
                "status": "completed",
                "call_id": "call_w",
                "name": "get_weather",
                "arguments": "{\"city\":\"Lima\"}"
            }],
            "parallel_tool_calls": true,
            "store": true,
            "tools": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(body_partial_json(json!({
            "previous_response_id": "resp_1",
            "input": [
                { "type": "function_call", "call_id": "call_w" },
                {
                    "type": "function_call_output",
                    "call_id": "call_w",
                    "output": "{\"celsius\":19}"
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp_2",
            "object": "response",
            "created_at": 1743556970,
            "status": "completed",
            "model": "gpt-4.1",
            "output": [{
                "id": "msg_2",
                "type": "message",
                "role": "assistant",
                "status": "completed",
                "content": [{ "type": "output_text", "text": "19°C in Lima.", "annotations": [] }]
            }],
            "parallel_tool_calls": true,
            "store": true,
            "tools": []
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut request = CreateResponseRequest::new("gpt-4.1", "Weather in Lima?");
    request.tools = vec![Tool::function(
        "get_weather",
        "Weather by city",
        json!({ "type": "object" }),
    )];

    let first = client.responses.create(&request).await.unwrap();
    let calls = first.function_calls();
    assert_eq!(calls.len(), 1);

    let mut items: Vec<ResponseInputItem> = first
        .output
        .iter()
        .filter_map(|item| item.to_input_item().unwrap())
        .collect();
    items.push(ToolOutput::json(&calls[0].call_id, &json!({ "celsius": 19 })).unwrap().into());

    request.input = ResponseInput::Items(items);
    request.previous_response_id = Some(first.id.clone());

    let second = client.responses.create(&request).await.unwrap();
    assert_eq!(second.output_text(), "19°C in Lima.");
}

#[tokio::test]
async fn test_responses_retrieve_and_list() {
    let server = MockServer::start().await;
    let stored = json!({
        "id": "resp_9",
        "object": "response",
        "created_at": 1743556966,
        "status": "completed",
        "model": "gpt-4.1",
        "output": [],
        "parallel_tool_calls": true,
        "store": true,
        "tools": []
    });

    Mock::given(method("GET"))
        .and(path("/v1/responses/resp_9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/responses"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [stored],
            "first_id": "resp_9",
            "last_id": "resp_9",
            "has_more": false
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.responses.retrieve("resp_9").await.unwrap().id, "resp_9");

    let params = ListParams {
        limit: Some(1),
        ..Default::default()
    };
    let list = client.responses.list(&params).await.unwrap();
    assert_eq!(list.data.len(), 1);
    assert_eq!(list.last_id.as_deref(), Some("resp_9"));
}

#[tokio::test]
async fn test_api_errors_are_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let request = CreateChatRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
    let err = client(&server).chats.create(&request).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Api { status: 429, ref message } if message == "Rate limit reached"
    ));
    assert!(!err.is_codec_error());
}
