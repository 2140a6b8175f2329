//! Console screen layout

use console::Term;

use crate::matching::MatchTier;
use crate::render::{ConsoleRenderer, Screen};

const WIDTH: usize = 40;
const TEXT_WIDTH: usize = 38;
const CURSOR: &str = ">>>";

/// Lines drawn for a screen
#[must_use]
pub fn layout(screen: &Screen) -> Vec<String> {
    let rule = "=".repeat(WIDTH);
    let mut lines = vec![rule.clone()];

    match screen {
        Screen::MainMenu => {
            lines.push("      ASSISTENTE EDUCACIONAL IA".to_string());
            lines.push(rule.clone());
            lines.push("W/S - Navegar     ENTER - Selecionar".to_string());
            lines.push("4 - Aleatório     3 - Voltar".to_string());
            lines.push("R - Repetir áudio Q - Sair".to_string());
            lines.push(rule);
        }
        Screen::Topics { topics, cursor } => {
            lines.push("         SELECIONE UM TEMA".to_string());
            lines.push(rule.clone());
            lines.extend(menu(topics, *cursor));
            lines.push(rule);
            lines.push("W/S - Navegar  ENTER - Selecionar".to_string());
        }
        Screen::Subtopics {
            topic,
            subtopics,
            cursor,
        } => {
            lines.push(format!("TEMA: {topic}"));
            lines.push(rule.clone());
            lines.extend(menu(subtopics, *cursor));
            lines.push(rule);
            lines.push("W/S - Navegar  ENTER - Selecionar".to_string());
        }
        Screen::QuestionMode { topic, subtopic } => {
            lines.push(format!("PERGUNTAS: {topic}"));
            lines.push(format!("SUBTEMA: {subtopic}"));
            lines.push(rule.clone());
            lines.push("ENTER - Fazer pergunta".to_string());
            lines.push("4 - Pergunta aleatória".to_string());
            lines.push("3 - Voltar ao menu anterior".to_string());
            lines.push("R - Repetir último áudio".to_string());
            lines.push(rule);
        }
        Screen::ConfirmQuestion { question } => {
            lines.push("      CONFIRMAÇÃO DE PERGUNTA".to_string());
            lines.push(rule.clone());
            lines.push("Pergunta capturada:".to_string());
            lines.extend(excerpt(question, TEXT_WIDTH, 3));
            lines.push(rule);
            lines.push("ENTER - Sim     3 - Não".to_string());
        }
        Screen::MatchFound {
            tier,
            related_question,
            asked,
        } => {
            lines.push(tier_banner(*tier).to_string());
            lines.push(rule.clone());
            lines.push("Sua pergunta:".to_string());
            lines.extend(wrap(asked, TEXT_WIDTH).into_iter().take(1));
            lines.push("---".to_string());
            lines.push("Pergunta relacionada:".to_string());
            lines.extend(excerpt(related_question, TEXT_WIDTH, 2));
            lines.push(rule);
            lines.push("ENTER - Ouvir resposta  3 - Pular".to_string());
        }
        Screen::Suggestions(suggestions) => {
            lines.push("    SUGESTÕES DE PERGUNTAS".to_string());
            lines.push(rule.clone());
            for (position, suggestion) in (1..).zip(suggestions) {
                if position > 1 {
                    lines.push("-".repeat(WIDTH));
                }
                lines.push(format!("SUGESTÃO {position}:"));
                lines.push(format!("Tema: {}", suggestion.topic));
                lines.push(format!("Subtema: {}", suggestion.subtopic));
                lines.extend(wrap(&suggestion.question, TEXT_WIDTH - 2).into_iter().take(2));
            }
            lines.push(rule);
        }
        Screen::Waiting { message } => {
            lines.push("          AGUARDE...".to_string());
            lines.push(rule.clone());
            lines.push(message.clone());
            lines.push(rule);
        }
        Screen::ReplayMenu { options, cursor } => {
            lines.push("       SUBMENU REPETIR ÁUDIO".to_string());
            lines.push(rule.clone());
            lines.extend(menu(options, *cursor));
            lines.push(rule);
            lines.push("W/S - Navegar  ENTER - Selecionar  3 - Voltar".to_string());
        }
    }

    lines
}

const fn tier_banner(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Excellent => "  CORRESPONDÊNCIA EXCELENTE",
        MatchTier::Good => "    CORRESPONDÊNCIA BOA",
        MatchTier::Minimal => " CORRESPONDÊNCIA MÍNIMA",
        MatchTier::Found => " CORRESPONDÊNCIA ENCONTRADA",
    }
}

fn menu(items: &[String], cursor: usize) -> impl Iterator<Item = String> + '_ {
    items.iter().enumerate().map(move |(i, item)| {
        let marker = if i == cursor { CURSOR } else { "   " };
        format!("{marker} {item}")
    })
}

/// Split into chunks of `width` characters
fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width.max(1)).map(|chunk| chunk.iter().collect()).collect()
}

/// First `max_lines` chunks, with an ellipsis line when truncated
fn excerpt(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap(text, width);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        lines.push("...".to_string());
    }
    lines
}

/// [`ConsoleRenderer`] that clears and redraws the terminal
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    term: Term,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleRenderer for TerminalRenderer {
    fn render(&mut self, screen: &Screen) {
        let drawn = self.term.clear_screen().and_then(|()| {
            layout(screen)
                .iter()
                .try_for_each(|line| self.term.write_line(line))
        });
        if let Err(e) = drawn {
            tracing::debug!(error = %e, "screen draw failed");
        }
    }
}
