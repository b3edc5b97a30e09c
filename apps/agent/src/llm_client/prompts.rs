// Shared prompt constants for talking to the local model.
// Module-specific instructions live in a prompts.rs next to the module that uses them.

/// Sentinel the model is told to emit after its answer. Also a stop sequence.
pub const END_OF_OUTPUT: &str = "<<FIN>>";

/// Turn marker; stopping on it keeps the model from inventing a next user turn.
pub const USER_TURN: &str = "Usuario:";

/// Cue placed after the data so the model starts answering immediately.
pub const ANSWER_CUE: &str = "Respuesta JSON:";

/// Instruction fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Responde ÚNICAMENTE con un objeto JSON válido. \
    No incluyas texto fuera del objeto JSON. \
    No uses bloques de código markdown. \
    No añadas explicaciones ni preguntas.";
