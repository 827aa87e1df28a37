//! Result document integration tests.

#[cfg(test)]
mod tests {
    use ixopay_model::{ReturnData, ReturnType};
    use ixopay_xml::{ParserConfig, XmlError, XmlResultParser, parse_result};

    use crate::{DocumentBuilder, creditcard_fragment, init_tracing};

    #[test]
    fn test_should_parse_redirect_result() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .text("success", "true")
            .text("referenceId", "c5e5c1d8a3f7")
            .text("returnType", "REDIRECT")
            .text("redirectUrl", "https://gateway.example.com/3ds?tx=1&step=2")
            .build();

        let result = parse_result(&xml).expect("redirect result should parse");
        assert!(result.success);
        assert_eq!(result.return_type, Some(ReturnType::Redirect));
        assert_eq!(
            result.redirect_url.as_deref(),
            Some("https://gateway.example.com/3ds?tx=1&step=2")
        );
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_should_parse_html_result() {
        init_tracing();
        let html = r#"<form method="post" action="https://acs.example.com"><input name="PaReq" value="abc"/></form>"#;
        let xml = DocumentBuilder::result()
            .text("success", "true")
            .text("returnType", "HTML")
            .text("htmlContent", html)
            .build();

        let result = parse_result(&xml).expect("html result should parse");
        assert_eq!(result.return_type, Some(ReturnType::Html));
        assert_eq!(result.html_content.as_deref(), Some(html));
    }

    #[test]
    fn test_should_parse_finished_result_with_creditcard_data() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .text("success", "true")
            .text("referenceId", "ref-1")
            .text("registrationId", "reg-1")
            .text("returnType", "FINISHED")
            .raw(&creditcard_fragment("A Holder", "7", "2031"))
            .text("paymentDescriptor", "SHOP 42")
            .build();

        let result = parse_result(&xml).expect("finished result should parse");
        assert_eq!(result.return_type, Some(ReturnType::Finished));
        assert_eq!(result.registration_id.as_deref(), Some("reg-1"));

        let Some(ReturnData::Creditcard(cc)) = &result.return_data else {
            panic!("expected creditcard payload, got {:?}", result.return_data);
        };
        assert_eq!(cc.card_holder.as_deref(), Some("A Holder"));
        assert_eq!(cc.expiry_month, Some(7));
        assert_eq!(cc.expiry_year, Some(2031));
        assert_eq!(cc.last_four_digits.as_deref(), Some("1111"));
    }

    #[test]
    fn test_should_parse_error_result() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .text("success", "")
            .text("returnType", "ERROR")
            .raw(
                "<errors>\
                 <error><message>Card declined</message><code>2003</code></error>\
                 <error><message>Risk check failed</message><code>1009</code>\
                 <adapterMessage>Blocked</adapterMessage></error>\
                 </errors>",
            )
            .build();

        let result = parse_result(&xml).expect("error result should parse");
        assert!(!result.success);
        assert_eq!(result.return_type, Some(ReturnType::Error));
        assert_eq!(result.errors.len(), 2);

        let first = result.first_error().expect("first error");
        assert_eq!(first.message.as_deref(), Some("Card declined"));
        assert_eq!(first.code.as_deref(), Some("2003"));
        assert!(first.adapter_code.is_none());

        assert_eq!(result.errors[1].code.as_deref(), Some("1009"));
        assert_eq!(result.errors[1].adapter_message.as_deref(), Some("Blocked"));
        assert!(result.errors[1].adapter_code.is_none());
    }

    #[test]
    fn test_should_reproduce_extra_data_entries_in_order() {
        init_tracing();
        let entries: Vec<(String, String)> = (0..25)
            .map(|i| (format!("key-{i}"), format!("value <{i}> & \"more\"")))
            .collect();

        let xml = entries
            .iter()
            .fold(DocumentBuilder::result(), |doc, (k, v)| doc.extra_data(k, v))
            .build();

        let result = parse_result(&xml).expect("result should parse");
        assert_eq!(result.extra_data.len(), entries.len());
        for ((key, value), (expected_key, expected_value)) in
            result.extra_data.iter().zip(&entries)
        {
            assert_eq!(key, expected_key.as_str());
            assert_eq!(value, expected_value.as_str());
        }
    }

    #[test]
    fn test_should_reject_extra_data_without_key() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .text("success", "1")
            .extra_data_without_key("orphan")
            .build();

        let err = parse_result(&xml).unwrap_err();
        assert!(err.is_structure(), "got {err:?}");
    }

    #[test]
    fn test_should_apply_legacy_exception_exemption() {
        init_tracing();
        let with_foo = DocumentBuilder::result()
            .text("success", "1")
            .text("foo", "bar")
            .build();
        let err = parse_result(&with_foo).unwrap_err();
        assert!(err.is_structure());
        assert_eq!(err.to_string(), "Unexpected element \"foo\"");

        let with_exception = DocumentBuilder::result()
            .text("success", "1")
            .text("exception", "bar")
            .build();
        let result = parse_result(&with_exception).expect("exception should be ignored");
        assert!(result.success);
    }

    #[test]
    fn test_should_reject_invalid_return_type() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .text("returnType", "REFUNDED")
            .build();

        let err = parse_result(&xml).unwrap_err();
        assert!(err.is_invalid_value());
        assert!(err.to_string().contains("REFUNDED"));
        assert!(err.to_string().contains("returnType"));
    }

    #[test]
    fn test_should_fail_on_wrong_namespace() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .namespace("http://www.ixolit.com/IxoPay/V1/Result")
            .text("success", "1")
            .build();

        let err = parse_result(&xml).unwrap_err();
        assert!(matches!(err, XmlError::Structure(_)), "got {err:?}");
    }

    #[test]
    fn test_should_share_parser_across_threads() {
        init_tracing();
        let parser = XmlResultParser::new(ParserConfig::default());
        let documents: Vec<String> = (0..8)
            .map(|i| {
                DocumentBuilder::result()
                    .text("success", "1")
                    .text("referenceId", &format!("ref-{i}"))
                    .build()
            })
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = documents
                .iter()
                .enumerate()
                .map(|(i, xml)| {
                    let parser = &parser;
                    scope.spawn(move || {
                        let result = parser.parse_result(xml).expect("result should parse");
                        assert_eq!(result.reference_id, Some(format!("ref-{i}")));
                    })
                })
                .collect();
            for handle in handles {
                handle.join().expect("parser thread panicked");
            }
        });
    }

    #[test]
    fn test_should_serialize_parsed_result_to_json() {
        init_tracing();
        let xml = DocumentBuilder::result()
            .text("success", "1")
            .text("returnType", "PENDING")
            .raw(&creditcard_fragment("J Doe", "12", "2030"))
            .extra_data("orderId", "o-77")
            .build();

        let result = parse_result(&xml).expect("result should parse");
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["returnType"], "PENDING");
        assert_eq!(json["returnData"]["type"], "creditcardData");
        assert_eq!(json["returnData"]["cardHolder"], "J Doe");
        assert_eq!(json["returnData"]["expiryYear"], 2030);
        assert_eq!(json["extraData"][0][0], "orderId");
    }
}
