//! Prompt construction for the AutoStream support assistant
//!
//! Three prompt shapes: the user-facing reply, lead-field extraction,
//! and the one-word fallback intent classification.

/// Lead fields already known for the current collection cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownFields<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub platform: Option<&'a str>,
}

impl KnownFields<'_> {
    fn field(value: Option<&str>) -> &str {
        value.unwrap_or("unknown")
    }
}

/// Builder for the user-facing reply prompt
///
/// The generated reply is grounded in the knowledge section when one is
/// present; otherwise the model is told nothing was found and instructed
/// not to fabricate.
#[derive(Debug, Default)]
pub struct ReplyPromptBuilder {
    transcript: String,
    user_message: String,
    intent: String,
    knowledge: Option<String>,
    post_signup: bool,
}

impl ReplyPromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the recent conversation transcript
    pub fn with_transcript(mut self, transcript: &str) -> Self {
        self.transcript = transcript.to_string();
        self
    }

    /// Add the current user message
    pub fn with_user_message(mut self, message: &str) -> Self {
        self.user_message = message.to_string();
        self
    }

    /// Add the detected intent label
    pub fn with_intent(mut self, intent: &str) -> Self {
        self.intent = intent.to_string();
        self
    }

    /// Add retrieved knowledge text, if any
    pub fn with_knowledge(mut self, knowledge: Option<&str>) -> Self {
        self.knowledge = knowledge.map(|k| k.to_string());
        self
    }

    /// Instruct the model to stop selling after a completed signup
    pub fn with_post_signup_note(mut self) -> Self {
        self.post_signup = true;
        self
    }

    /// Build the final prompt
    pub fn build(self) -> String {
        let knowledge_section = match self.knowledge.as_deref() {
            Some(knowledge) => format!(
                "Use the following official knowledge base info and keep your answer grounded to it:\n{}",
                knowledge
            ),
            None => {
                "No reliable info found in the knowledge base. Do NOT invent product details."
                    .to_string()
            }
        };

        let post_signup_note = if self.post_signup {
            "\nNOTE: The user has successfully signed up. Do NOT try to sell again; focus on support and answering."
        } else {
            ""
        };

        format!(
            r#"You are the AutoStream SaaS support assistant.

Conversation history:
{transcript}

User said: "{message}"
Detected intent: {intent}

{knowledge_section}

STRICT RULES:
- If no info is available, say you don't have that information
- DO NOT MAKE UP PRICES, FEATURES, OR CLAIMS
- If the user asks something outside the context, say you will connect them to sales
Write a friendly, to the point and concise reply.
If the user seems mildly interested in the product, nudge them ever so slightly to try it, but don't be a pushy sales agent.
{post_signup_note}"#,
            transcript = self.transcript,
            message = self.user_message,
            intent = self.intent,
            knowledge_section = knowledge_section,
            post_signup_note = post_signup_note,
        )
    }
}

/// Build the lead-field extraction prompt
///
/// The model is asked for a strict JSON record with nullable `name`,
/// `email`, and `platform` fields, extracted only from explicit mentions
/// in the message, the recent history, and the already-known values.
pub fn extraction_prompt(transcript: &str, user_message: &str, known: KnownFields<'_>) -> String {
    format!(
        r#"You extract structured lead details from free-form text.

Extract ONLY the following fields if explicitly mentioned:
- name
- email
- platform of interest (e.g., LinkedIn, YouTube, Instagram, WhatsApp, Website)

Rules:
- Do NOT invent missing fields
- If a field is missing, output null
- If multiple options exist, choose the clearest one
- Values may exist in the history as well

Respond ONLY with valid JSON. Do not add any explanation. JSON should follow the form:
{{
  "name": <string or null>,
  "email": <string or null>,
  "platform": <string or null>
}}

History of messages:
{transcript}

User message:
"""{user_message}"""

Conversation so far (may contain previous info):
Name: {name}
Email: {email}
Platform: {platform}"#,
        transcript = transcript,
        user_message = user_message,
        name = KnownFields::field(known.name),
        email = KnownFields::field(known.email),
        platform = KnownFields::field(known.platform),
    )
}

/// Build the fallback intent classification prompt
///
/// The model must answer with exactly one label word.
pub fn classification_prompt(user_message: &str) -> String {
    format!(
        r#"You are an intent classification model for a SaaS support assistant.
Classify the user's intent into exactly one of these:
- greeting
- product_inquiry (general questions about product features, pricing, plans, etc.)
- high_intent_lead (showing interest in signing up, purchasing, or requesting account-related actions)
Respond ONLY with the one-word label.
User message: "{}""#,
        user_message
    )
}
