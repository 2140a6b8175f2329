//! Spoken kiosk phrases (Brazilian Portuguese)

use crate::matching::MatchTier;

pub const INTRO: &[&str] = &[
    "Bem vindo! Sou seu Assistente Educacional, Starlight!",
    "Use W e S para navegar",
    "ENTER para selecionar",
    "Tecla 4 para modo aleatório",
    "Tecla 3 para voltar",
    "Tecla R para acessar o menu de repetir áudio",
];

pub const SEARCH_NOTES: &[&str] = &[
    "Atenção importante sobre o sistema de busca:",
    "Quando você fizer uma pergunta, o sistema buscará a resposta mais relacionada",
    "A correspondência pode ser excelente, boa, mínima ou apenas relacionada",
    "Sempre confirmarei a pergunta exata encontrada antes de dar a resposta",
    "Assim você tem certeza de que é isso que quer ouvir",
];

pub const FAREWELL: &str = "Até logo! Starlight encerrando";

// Navigation
pub const CHOOSE_TOPIC: &str = "Escolha um tema";
pub const MAIN_MENU: &str = "Menu principal";
pub const CHOOSING_TOPIC: &str = "Escolhendo tema";
pub const CHOOSING_SUBTOPIC: &str = "Escolhendo subtema";
pub const NO_TOPICS: &str = "Nenhum tema disponível";
pub const LOAD_FAILED: &str = "Erro ao carregar dados";

// Ask and match
pub const ASK: &str = "Fale sua pergunta";
pub const LISTENING: &str = "Escutando... Fale agora";
pub const SEARCHING: &str = "Buscando resposta...";
pub const QUESTION_CANCELLED: &str = "Pergunta cancelada";
pub const RELATED_QUESTION: &str = "A pergunta relacionada é:";
pub const OFFER_MATCHED_ANSWER: &str = "Esta é a resposta que você quer ouvir?";
pub const ANSWER_NOT_PLAYED: &str = "Resposta não reproduzida";

// Capture failures
pub const HEARD_NOTHING: &str = "Não ouvi nada";
pub const NOT_UNDERSTOOD: &str = "Não consegui entender";
pub const MICROPHONE_ERROR: &str = "Erro no microfone";

// Suggestions
pub const NO_ANSWER: &str = "Não encontrei uma resposta específica para sua pergunta.";
pub const SUGGESTIONS_INTRO: &str = "Aqui estão algumas sugestões de perguntas que você pode fazer:";
pub const SUGGESTIONS_OUTRO: &str = "Essas são sugestões de perguntas relacionadas.";
pub const NO_SUGGESTIONS: &str = "Não tenho sugestões no momento.";

// Random
pub const RANDOM_ANYWHERE: &str = "Pergunta aleatória de toda a base";
pub const RANDOM_SUBTOPIC: &str = "Pergunta aleatória deste subtema";
pub const NOTHING_ANYWHERE: &str = "Não encontrei perguntas na base de dados";
pub const RANDOM_QUESTION: &str = "Pergunta aleatória";
pub const OFFER_RANDOM_ANSWER: &str = "Quer ouvir a resposta?";
pub const ANSWER_SKIPPED: &str = "Resposta pulada";

// Replay submenu
pub const REPLAY_MENU: &str = "Submenu repetir áudio. Use W e S para navegar";
pub const REPLAY_OPTIONS: [&str; 2] = ["Repetir áudio gravado", "Repetir última resposta"];
pub const REPLAYING_AUDIO: &str = "Repetindo áudio gravado";
pub const REPLAY_AUDIO_FAILED: &str = "Erro ao reproduzir áudio";
pub const NO_AUDIO: &str = "Nenhum áudio gravado para repetir";
pub const REPLAYING_ANSWER: &str = "Repetindo última resposta";
pub const NO_ANSWER_YET: &str = "Nenhuma resposta anterior para repetir";

pub fn topic_chosen(topic: &str) -> String {
    format!("Tema {topic}")
}

pub fn subtopic_drawn(subtopic: &str) -> String {
    format!("Subtema: {subtopic}")
}

pub fn loading(subtopic: &str) -> String {
    format!("Carregando {subtopic}")
}

pub fn loaded(count: usize) -> String {
    format!("Pronto. {count} perguntas carregadas")
}

pub fn you_asked(question: &str) -> String {
    format!("Você perguntou: {question}")
}

pub fn heard(text: &str) -> String {
    format!("Ouvi: {text}")
}

pub fn random_from_topic(topic: &str) -> String {
    format!("Pergunta aleatória de {topic}")
}

pub fn nothing_in_topic(topic: &str) -> String {
    format!("Não encontrei perguntas em {topic}")
}

pub fn drawn_from(topic: &str, subtopic: &str) -> String {
    format!("De {topic}, {subtopic}")
}

pub fn suggestion(position: usize, topic: &str, subtopic: &str) -> String {
    format!("Sugestão {position}, do tema {topic}, subtema {subtopic}:")
}

pub const fn tier(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Excellent => "Encontrei uma correspondência excelente",
        MatchTier::Good => "Encontrei uma boa correspondência",
        MatchTier::Minimal => "Encontrei uma correspondência mínima",
        MatchTier::Found => "Encontrei uma correspondência",
    }
}
