//! Fixed texts the bot publishes.

use crate::agent::signals::ShutdownSignal;

/// Usage text for the help command.
pub const HELP_TEXT: &str = "\
使い方を表示するお！
help|ヘルプ|へるぷ : このメッセージを表示するお。
(褒め|ほめ|ホメ|称え|たたえ)(ろ|て) : やる夫が特別にいいねしてやるお。
ニュース|News|NEWS|news : ゲーム関連のニュースを表示するお。
それ以外のメッセージ : AIによる応答を返信するお。
";

pub const FAV_REPLY: &str = "おまいはよく頑張ったお。特別に、やる夫がいいねしてやるお。";

/// Affirmative reaction content.
pub const FAV_REACTION: &str = "+";

pub const STARTUP: &str = "おっきしたお。";

pub fn farewell(signal: ShutdownSignal) -> String {
    format!("寝るお。({signal})")
}
