use mindpad_core::{
    AiActionClient, AiActionKind, AiError, GenerationRequest, GeneratorError, TextGenerator,
    SAMPLING_TEMPERATURE,
};
use std::cell::RefCell;

/// Records every request and replays one canned outcome.
struct ScriptedGenerator {
    reply: Result<String, &'static str>,
    calls: RefCell<Vec<(String, String, f64)>>,
}

impl ScriptedGenerator {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn failing(message: &'static str) -> Self {
        Self {
            reply: Err(message),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GeneratorError> {
        self.calls.borrow_mut().push((
            request.instruction.to_string(),
            request.input.to_string(),
            request.temperature,
        ));
        self.reply
            .clone()
            .map_err(|message| GeneratorError::Transport(message.to_string()))
    }
}

#[test]
fn empty_input_fails_without_remote_call() {
    let client = AiActionClient::new(ScriptedGenerator::replying("unused"));

    for input in ["", "   ", "\n\t"] {
        let err = client.process(input, AiActionKind::FixGrammar).unwrap_err();
        assert!(matches!(err, AiError::EmptyInput));
    }
    assert_eq!(client.generator().call_count(), 0);
}

#[test]
fn sends_instruction_profile_input_and_fixed_temperature() {
    let client = AiActionClient::new(ScriptedGenerator::replying("Summary."));
    let result = client
        .process("A long paragraph.", AiActionKind::Summarize)
        .unwrap();
    assert_eq!(result, "Summary.");

    let calls = client.generator().calls.borrow();
    assert_eq!(calls.len(), 1);
    let (instruction, input, temperature) = &calls[0];
    assert_eq!(instruction, AiActionKind::Summarize.instruction());
    assert_eq!(input, "A long paragraph.");
    assert_eq!(*temperature, SAMPLING_TEMPERATURE);
    assert_eq!(*temperature, 0.7);
}

#[test]
fn result_is_trimmed() {
    let client = AiActionClient::new(ScriptedGenerator::replying("\n  the cat \n"));
    let result = client.process("teh cat", AiActionKind::FixGrammar).unwrap();
    assert_eq!(result, "the cat");
}

#[test]
fn blank_result_is_a_service_error() {
    let client = AiActionClient::new(ScriptedGenerator::replying("   "));
    let err = client
        .process("keep going", AiActionKind::ContinueWriting)
        .unwrap_err();
    assert!(matches!(
        err,
        AiError::Service(GeneratorError::EmptyResponse)
    ));
    assert_eq!(client.generator().call_count(), 1);
}

#[test]
fn generator_failure_is_a_service_error_without_retry() {
    let client = AiActionClient::new(ScriptedGenerator::failing("connection reset"));
    let err = client.process("text", AiActionKind::MakeLonger).unwrap_err();

    assert!(matches!(err, AiError::Service(GeneratorError::Transport(_))));
    assert_eq!(
        err.user_message(),
        "Failed to process text with AI. Please try again."
    );
    assert_eq!(client.generator().call_count(), 1);
}

#[test]
fn each_action_uses_its_own_profile() {
    let generator = ScriptedGenerator::replying("ok");
    let client = AiActionClient::new(&generator);
    for kind in AiActionKind::ALL {
        client.process("input", kind).unwrap();
    }

    let instructions: Vec<String> = generator
        .calls
        .borrow()
        .iter()
        .map(|(instruction, _, _)| instruction.clone())
        .collect();
    assert_eq!(instructions.len(), 4);
    for (idx, instruction) in instructions.iter().enumerate() {
        assert!(!instructions[idx + 1..].contains(instruction));
    }
}
