use crate::types::fragment::{AccumulatedToolCall, ToolCallFragment};

/// Merges one fragment into the accumulated call state.
///
/// - `id`: the fragment's id when non-empty, else the current id, else empty.
/// - `name`: current name followed by the fragment's name piece. Some providers
///   split the name across fragments just like the arguments.
/// - `arguments_text`: current text followed by the fragment's chunk.
///
/// Never fails and never discards accumulated text. Fragments must be merged
/// in production order; string concatenation is not commutative.
pub fn merge(
    current: Option<AccumulatedToolCall>,
    fragment: &ToolCallFragment,
) -> AccumulatedToolCall {
    let mut call = current.unwrap_or_default();

    if let Some(id) = fragment.id.as_deref().filter(|id| !id.is_empty()) {
        call.id = id.to_string();
    }
    if let Some(name) = fragment.name.as_deref() {
        call.name.push_str(name);
    }
    if let Some(chunk) = fragment.arguments_chunk.as_deref() {
        call.arguments_text.push_str(chunk);
    }

    call
}

/// Cheap gate deciding whether a validation attempt is worth making.
///
/// True once both a name and some argument text have arrived. This says
/// nothing about whether `arguments_text` is complete JSON.
pub fn is_candidate(call: &AccumulatedToolCall) -> bool {
    !call.name.is_empty() && !call.arguments_text.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag() -> ToolCallFragment {
        ToolCallFragment::new()
    }

    #[test]
    fn test_merge_from_absent() {
        let call = merge(None, &frag().with_id("call_1").with_name("provideLinks"));
        assert_eq!(call.id(), "call_1");
        assert_eq!(call.name(), "provideLinks");
        assert_eq!(call.arguments_text(), "");
    }

    #[test]
    fn test_merge_absent_with_empty_fragment_is_blank() {
        let call = merge(None, &frag());
        assert_eq!(call, AccumulatedToolCall::default());
    }

    #[test]
    fn test_empty_fragment_is_idempotent() {
        let call = merge(
            None,
            &frag()
                .with_id("call_1")
                .with_name("provideLinks")
                .with_arguments("{\"links\":"),
        );
        let before = call.clone();

        let after = merge(Some(call), &frag());
        assert_eq!(after, before);

        let after = merge(
            Some(after),
            &frag().with_id("").with_name("").with_arguments(""),
        );
        assert_eq!(after, before);
    }

    #[test]
    fn test_name_is_concatenated() {
        let call = merge(None, &frag().with_name("provide"));
        let call = merge(Some(call), &frag().with_name("Links"));
        assert_eq!(call.name(), "provideLinks");
    }

    #[test]
    fn test_later_id_wins() {
        let call = merge(None, &frag().with_id("call_1"));
        let call = merge(Some(call), &frag().with_arguments("{"));
        assert_eq!(call.id(), "call_1");
        let call = merge(Some(call), &frag().with_id("call_2"));
        assert_eq!(call.id(), "call_2");
    }

    #[test]
    fn test_order_sensitivity() {
        let first = frag().with_arguments("{\"a\":1");
        let second = frag().with_arguments("}");

        let in_order = merge(Some(merge(None, &first)), &second);
        assert_eq!(in_order.arguments_text(), "{\"a\":1}");
        assert!(serde_json::from_str::<serde_json::Value>(in_order.arguments_text()).is_ok());

        let reversed = merge(Some(merge(None, &second)), &first);
        assert_eq!(reversed.arguments_text(), "}{\"a\":1");
        assert!(serde_json::from_str::<serde_json::Value>(reversed.arguments_text()).is_err());
    }

    #[test]
    fn test_arguments_only_grow() {
        let chunks = ["{\"li", "nks\":[", "", "]}"];
        let mut call = None;
        let mut last_len = 0;
        for c in chunks {
            let merged = merge(call.take(), &frag().with_arguments(c));
            assert!(merged.arguments_text().len() >= last_len);
            last_len = merged.arguments_text().len();
            call = Some(merged);
        }
        assert_eq!(call.unwrap().arguments_text(), "{\"links\":[]}");
    }

    #[test]
    fn test_is_candidate() {
        assert!(!is_candidate(&AccumulatedToolCall::default()));

        let named = merge(None, &frag().with_name("provideLinks"));
        assert!(!is_candidate(&named));

        let args_only = merge(None, &frag().with_arguments("{"));
        assert!(!is_candidate(&args_only));

        // Incomplete JSON still qualifies: the detector is only a gate.
        let both = merge(Some(named), &frag().with_arguments("{\"links\""));
        assert!(is_candidate(&both));
    }
}
