//! Prompt templates
//!
//! One parameterized persona template covers every answer the assistant
//! gives; the grounding rule ("answer only from the context") lives here as
//! prompt text. It is a behavioral contract, not something the code
//! validates after the fact.

use crate::providers::generation::PromptMessage;
use crate::types::chat::ChatMessage;
use crate::types::document::ScoredChunk;

/// Instruction appended after the conversation when rewriting a follow-up
/// question into one standalone search query.
const REPHRASE_INSTRUCTION: &str = "Based on the above conversation, craft a precise search query \
to retrieve relevant information from the vectorstore for the current question. Include all \
necessary keywords and avoid omitting critical details. Return only the query, with no \
additional text.";

/// Persona and behavioral rules for the shopping assistant. `{context}` is
/// replaced with the retrieved catalog chunks.
const PERSONA_TEMPLATE: &str = "You are Kofi, a knowledgeable and friendly shopping assistant at \
an online marketplace.
Your role is to assist customers by providing detailed information and guidance about products.
Each product in the context carries the following fields: Sub-category, Price, Discount (some \
products may not have one), and Ratings (some products may not have any).
Your goal is to leverage this information to answer customer queries, provide recommendations, \
and help them make informed purchasing decisions.
Stay within the provided context when answering queries. If a query falls outside the context, \
politely guide the customer to relevant inquiries.

When crafting recommendations:
1. Recommend three products across different price ranges within the sub-category.
2. For each option, include Price, Discounts (if available), Ratings, and key Features.
3. Keep recommendations concise, engaging, and informative, in a casual and friendly tone.
4. Prioritize the least expensive or highest-rated product in a sub-category when applicable.
5. Close with a call to action, such as asking about the customer's budget.

When answering product questions, provide specific details (Price, Discounts, Ratings, key \
Features) cross-checked against the context; if a product is unavailable, say so politely and \
offer alternatives from the same sub-category.

Focus exclusively on the context provided below. Do not include information about products that \
are not in it.

Context:
{context}";

/// Prompt builder for the conversational pipeline
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved chunks into the context block, most relevant
    /// first, content verbatim.
    pub fn build_context(context: &[ScoredChunk]) -> String {
        context
            .iter()
            .map(|scored| scored.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Model request that rewrites (history, question) into one standalone
    /// search query.
    pub fn rephrase_query(history: &[ChatMessage], question: &str) -> Vec<PromptMessage> {
        let mut messages: Vec<PromptMessage> = history.iter().map(PromptMessage::from).collect();
        messages.push(PromptMessage::user(question));
        messages.push(PromptMessage::user(REPHRASE_INSTRUCTION));
        messages
    }

    /// Model request for a grounded answer: persona + context, then the
    /// customer's question.
    pub fn grounded_answer(context: &[ScoredChunk], question: &str) -> Vec<PromptMessage> {
        let system = PERSONA_TEMPLATE.replace("{context}", &Self::build_context(context));
        vec![PromptMessage::system(system), PromptMessage::user(question)]
    }
}
