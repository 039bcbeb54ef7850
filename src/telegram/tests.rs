#[cfg(test)]
mod tests {
    use crate::telegram::client::TelegramClient;
    use crate::telegram::models::{main_menu, restart_confirmation};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn main_menu_has_one_action_per_row() {
        let menu = main_menu();
        assert_eq!(menu.inline_keyboard.len(), 4);
        let actions: Vec<&str> = menu
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(actions, vec!["status", "speed", "restart", "monitoring"]);
    }

    #[test]
    fn restart_confirmation_offers_confirm_and_cancel() {
        let menu = restart_confirmation();
        let actions: Vec<&str> = menu
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(actions, vec!["restart_confirm", "cancel"]);
    }

    #[tokio::test]
    async fn send_message_posts_the_expected_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(body_string_contains("chat_id=42"))
            .and(body_string_contains("parse_mode=Markdown"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri()).expect("client");
        client.send_message(42, "hello", None).await.expect("send");
    }

    #[tokio::test]
    async fn send_message_serializes_the_keyboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(body_string_contains("reply_markup"))
            .and(body_string_contains("restart_confirm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri()).expect("client");
        client
            .send_message(42, "confirm?", Some(&restart_confirmation()))
            .await
            .expect("send");
    }

    #[tokio::test]
    async fn send_message_surfaces_api_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri()).expect("client");
        let err = client
            .send_message(42, "hello", None)
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn get_updates_decodes_messages_and_callbacks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getUpdates"))
            .and(query_param("offset", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    {
                        "update_id": 8,
                        "message": {
                            "message_id": 1,
                            "chat": {"id": 42},
                            "text": "/status"
                        }
                    },
                    {
                        "update_id": 9,
                        "callback_query": {
                            "id": "cb-1",
                            "from": {"id": 42},
                            "message": {"message_id": 2, "chat": {"id": 42}},
                            "data": "restart"
                        }
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri()).expect("client");
        let updates = client.get_updates(7).await.expect("updates");

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].update_id, 8);
        assert_eq!(
            updates[0].message.as_ref().and_then(|m| m.text.as_deref()),
            Some("/status")
        );
        let callback = updates[1].callback_query.as_ref().expect("callback");
        assert_eq!(callback.data.as_deref(), Some("restart"));
    }

    #[tokio::test]
    async fn get_updates_rejected_by_the_api_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "description": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri()).expect("client");
        let err = client.get_updates(0).await.expect_err("should fail");
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn answer_callback_posts_the_callback_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/answerCallbackQuery"))
            .and(body_string_contains("callback_query_id=cb-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri()).expect("client");
        client.answer_callback("cb-1").await.expect("answer");
    }
}
