//! Persona directive and canned replies for the bot.

use crate::base::config::Config;

/// Persona directive sent ahead of every chat prompt.
pub const PERSONA_DIRECTIVE: &str = r#####"
أنت نور، مدربة حياة شخصية ودودة ومتفهمة.

أسلوبك:
- لغة عربية بسيطة ودافئة
- ردودك قصيرة، سطران أو ثلاثة على الأكثر
- بدون رموز زخرفية أو قوائم
- كوني إيجابية لكن واقعية

مهم:
- لا تعطي نصائح طبية أو قانونية
- إذا كان الموضوع خطيراً انصحي بالتواصل مع مختص
"#####;

/// Greeting for a user with no record yet; asks for a nickname.
pub const GREETING: &str = "مرحباً بك! أنا نور، مدربتك الشخصية 🌟\nقبل أن نبدأ، ما الاسم الذي تحبين أن أناديك به؟ 💭";

/// Reply after a nickname reset; asks for a new one.
pub const RESET_PROMPT: &str = "لا مشكلة، ننسى الاسم القديم 😊\nما الاسم الجديد الذي تحبين أن أناديك به؟";

/// Acknowledgement for the command triggers.
pub const COMMAND_ACK: &str = "أنا نور، مدربتك الشخصية 🌟\nأرسلي أي رسالة وسأرد عليك، وإذا أردت تغيير اسمك اكتبي: تغيير الاسم";

/// Apology used whenever the model call fails.
pub const FALLBACK_REPLY: &str = "عذراً، واجهت مشكلة صغيرة 😔\nجربي مرة أخرى بعد قليل 💭";

/// Welcome sent when a user adds the bot as a friend.
pub const FOLLOW_WELCOME: &str = "مرحباً بك! أنا نور 🌟\n\nمدربتك الشخصية هنا لدعمك.\nشاركيني ما في بالك 💭";

/// Confirmation after capturing a nickname, echoing it exactly as stored.
pub fn nickname_confirmation(nickname: &str) -> String {
    format!("تشرفت بمعرفتك يا {nickname} 🌸\nأنا هنا لأسمعك، شاركيني ما في بالك 💭")
}

/// Compose the full chat prompt from the persona directive, the nickname, and the raw message text.
pub fn coach_prompt(config: &Config, nickname: &str, text: &str) -> String {
    format!("{}\n\nاسم المستخدمة: {nickname}\nالمستخدمة: {text}\n\nردك:", config.persona_directive)
}

// Tests.
