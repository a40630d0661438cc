//! パターンテーブル
//!
//! セット名・コード対応、総数→候補セット、ストップワード等の静的参照データ。
//! 起動時に一度だけ初期化され、以後不変。ロジックはここに置かない。

use std::collections::HashSet;

/// OCRテキストの最大長（正規表現DoS対策）
pub const MAX_OCR_TEXT_LENGTH: usize = 10_000;

/// セット名（大文字英語表記）→ セットコード対応表
pub static SET_NAME_TO_CODE: &[(&str, &str)] = &[
    // スカーレット＆バイオレット期
    ("SCARLET & VIOLET", "sv1"),
    ("SCARLET AND VIOLET", "sv1"),
    ("PALDEA EVOLVED", "sv2"),
    ("OBSIDIAN FLAMES", "sv3"),
    ("151", "sv3pt5"),
    // "MEW" は "MEWTWO" に誤一致するため登録しない。sv3pt5 は "151" で判定する
    ("PARADOX RIFT", "sv4"),
    ("PALDEAN FATES", "sv4pt5"),
    ("TEMPORAL FORCES", "sv5"),
    ("TWILIGHT MASQUERADE", "sv6"),
    ("SHROUDED FABLE", "sv6pt5"),
    ("STELLAR CROWN", "sv7"),
    ("SURGING SPARKS", "sv8"),
    ("PRISMATIC EVOLUTIONS", "sv8pt5"),
    ("JOURNEY TOGETHER", "sv9"),
    // ソード＆シールド期
    ("SWORD & SHIELD", "swsh1"),
    ("SWORD AND SHIELD", "swsh1"),
    ("REBEL CLASH", "swsh2"),
    ("DARKNESS ABLAZE", "swsh3"),
    ("CHAMPION'S PATH", "swsh3pt5"),
    ("CHAMPIONS PATH", "swsh3pt5"),
    ("VIVID VOLTAGE", "swsh4"),
    ("SHINING FATES", "swsh4pt5"),
    ("BATTLE STYLES", "swsh5"),
    ("CHILLING REIGN", "swsh6"),
    ("EVOLVING SKIES", "swsh7"),
    ("CELEBRATIONS", "cel25"),
    ("FUSION STRIKE", "swsh8"),
    ("BRILLIANT STARS", "swsh9"),
    ("ASTRAL RADIANCE", "swsh10"),
    ("POKEMON GO", "pgo"),
    ("LOST ORIGIN", "swsh11"),
    ("SILVER TEMPEST", "swsh12"),
    ("CROWN ZENITH", "swsh12pt5"),
    // サン＆ムーン期
    ("SUN & MOON", "sm1"),
    ("SUN AND MOON", "sm1"),
    ("GUARDIANS RISING", "sm2"),
    ("BURNING SHADOWS", "sm3"),
    ("SHINING LEGENDS", "sm3pt5"),
    ("CRIMSON INVASION", "sm4"),
    ("ULTRA PRISM", "sm5"),
    ("FORBIDDEN LIGHT", "sm6"),
    ("CELESTIAL STORM", "sm7"),
    ("DRAGON MAJESTY", "sm7pt5"),
    ("LOST THUNDER", "sm8"),
    ("TEAM UP", "sm9"),
    ("DETECTIVE PIKACHU", "det1"),
    ("UNBROKEN BONDS", "sm10"),
    ("UNIFIED MINDS", "sm11"),
    ("HIDDEN FATES", "sm11pt5"),
    ("COSMIC ECLIPSE", "sm12"),
    // XY期
    ("XY", "xy1"),
    ("FLASHFIRE", "xy2"),
    ("FURIOUS FISTS", "xy3"),
    ("PHANTOM FORCES", "xy4"),
    ("PRIMAL CLASH", "xy5"),
    ("ROARING SKIES", "xy6"),
    ("ANCIENT ORIGINS", "xy7"),
    ("BREAKTHROUGH", "xy8"),
    ("BREAKPOINT", "xy9"),
    ("FATES COLLIDE", "xy10"),
    ("STEAM SIEGE", "xy11"),
    ("EVOLUTIONS", "xy12"),
    // ブラック＆ホワイト期
    ("BLACK & WHITE", "bw1"),
    ("BLACK AND WHITE", "bw1"),
    ("EMERGING POWERS", "bw2"),
    ("NOBLE VICTORIES", "bw3"),
    ("NEXT DESTINIES", "bw4"),
    ("DARK EXPLORERS", "bw5"),
    ("DRAGONS EXALTED", "bw6"),
    ("BOUNDARIES CROSSED", "bw7"),
    ("PLASMA STORM", "bw8"),
    ("PLASMA FREEZE", "bw9"),
    ("PLASMA BLAST", "bw10"),
    ("LEGENDARY TREASURES", "bw11"),
    // ハートゴールド＆ソウルシルバー期
    ("HEARTGOLD & SOULSILVER", "hgss1"),
    ("HEARTGOLD SOULSILVER", "hgss1"),
    ("HGSS", "hgss1"),
    ("UNLEASHED", "hgss2"),
    ("UNDAUNTED", "hgss3"),
    ("TRIUMPHANT", "hgss4"),
    ("CALL OF LEGENDS", "col1"),
    // ダイヤモンド＆パール期
    ("DIAMOND & PEARL", "dp1"),
    ("DIAMOND AND PEARL", "dp1"),
    ("MYSTERIOUS TREASURES", "dp2"),
    ("SECRET WONDERS", "dp3"),
    ("GREAT ENCOUNTERS", "dp4"),
    ("MAJESTIC DAWN", "dp5"),
    ("LEGENDS AWAKENED", "dp6"),
    ("STORMFRONT", "dp7"),
    ("PLATINUM", "pl1"),
    ("RISING RIVALS", "pl2"),
    ("SUPREME VICTORS", "pl3"),
    ("ARCEUS", "pl4"),
    // EX期
    ("RUBY & SAPPHIRE", "ex1"),
    ("RUBY AND SAPPHIRE", "ex1"),
    ("SANDSTORM", "ex2"),
    ("EX DRAGON", "ex3"), // "DRAGON" 単独はカード文に頻出のため不可
    ("TEAM MAGMA VS TEAM AQUA", "ex4"),
    ("HIDDEN LEGENDS", "ex5"),
    ("FIRERED & LEAFGREEN", "ex6"),
    ("TEAM ROCKET RETURNS", "ex7"),
    ("DEOXYS", "ex8"),
    ("EMERALD", "ex9"),
    ("UNSEEN FORCES", "ex10"),
    ("DELTA SPECIES", "ex11"),
    ("LEGEND MAKER", "ex12"),
    ("HOLON PHANTOMS", "ex13"),
    ("CRYSTAL GUARDIANS", "ex14"),
    ("DRAGON FRONTIERS", "ex15"),
    ("POWER KEEPERS", "ex16"),
    // 旧WotC期
    ("BASE SET", "base1"),
    // "BASE" 単独は "base damage" 等に一致するため登録しない
    ("JUNGLE", "base2"),
    ("FOSSIL", "base3"),
    ("BASE SET 2", "base4"),
    ("TEAM ROCKET", "base5"),
    ("LEGENDARY COLLECTION", "base6"),
    ("GYM HEROES", "gym1"),
    ("GYM CHALLENGE", "gym2"),
    ("NEO GENESIS", "neo1"),
    ("NEO DISCOVERY", "neo2"),
    ("NEO REVELATION", "neo3"),
    ("NEO DESTINY", "neo4"),
    ("EXPEDITION", "ecard1"),
    ("AQUAPOLIS", "ecard2"),
    ("SKYRIDGE", "ecard3"),
    // WotCプロモ
    ("WIZARDS BLACK STAR", "basep"),
    ("WOTC PROMO", "basep"),
    ("BLACK STAR PROMO", "basep"),
];

/// 語境界の確認が必要な短いセット名
///
/// "BASE" は攻撃文中の "BASE DAMAGE" 等に部分一致するため、
/// 前後が空白・記号・行端のときだけセット名として扱う。
pub static SHORT_SET_NAMES: &[&str] = &["BASE", "FOSSIL", "JUNGLE"];

/// 旧2文字コード（物理カード下部に印字されるオンライン引換コード）→ セットコード
pub static LEGACY_CODE_TO_SET: &[(&str, &str)] = &[
    ("BS", "base1"),
    ("JU", "base2"),
    ("FO", "base3"),
    ("B2", "base4"),
    ("TR", "base5"),
    ("LC", "base6"),
    ("G1", "gym1"),
    ("G2", "gym2"),
    ("N1", "neo1"),
    ("N2", "neo2"),
    ("N3", "neo3"),
    ("N4", "neo4"),
    ("SI", "si1"),
    // "EX" は現行の ex サフィックスと衝突するため登録しない。
    // Expedition はセット名か総数で判定する
    ("AQ", "ecard2"),
    ("SK", "ecard3"),
];

/// セット総数 → 候補セットコード一覧
///
/// XX/YYY 形式の YYY からセットを推定する。総数が複数セットで共有される
/// 場合は候補を列挙する（新しい・流通量の多いセットを先頭に置く）。
pub static SET_TOTAL_TO_CANDIDATES: &[(&str, &[&str])] = &[
    // スカーレット＆バイオレット期（固有総数）
    ("193", &["sv2"]),
    ("197", &["sv3"]),
    ("182", &["sv4"]),
    ("218", &["sv5"]),
    ("167", &["sv6"]),
    ("175", &["sv7"]),
    ("191", &["sv8"]),
    ("186", &["sv8pt5"]),
    ("169", &["sv9"]),
    // ソード＆シールド期（固有総数）
    ("202", &["swsh1"]),
    ("192", &["swsh2"]),
    ("185", &["swsh4"]),
    ("163", &["swsh5"]),
    ("203", &["swsh7"]),
    ("264", &["swsh8"]),
    ("172", &["swsh9"]),
    ("196", &["swsh11"]),
    ("195", &["swsh12"]),
    ("159", &["swsh12pt5"]),
    // 共有総数
    ("198", &["sv1", "swsh6"]),
    ("189", &["swsh10", "swsh3"]),
    // サン＆ムーン期
    ("156", &["sm5"]),
    ("131", &["sm6"]),
    ("168", &["sm7"]),
    ("214", &["sm8"]),
    ("181", &["sm9"]),
    ("234", &["sm10"]),
    ("236", &["sm11"]),
    ("271", &["sm12"]),
    ("69", &["sm7pt5"]),
    ("68", &["sm11pt5"]),
    // XY期
    ("119", &["xy4"]),
    ("164", &["xy5"]),
    ("162", &["xy8"]),
    ("125", &["xy10"]),
    // ブラック＆ホワイト期
    ("135", &["bw8"]),
    ("116", &["bw9"]),
    ("115", &["bw11"]),
    // プラチナ期
    ("127", &["pl1"]),
    // 旧WotC期（他の期と総数を共有するものを含む）
    ("102", &["base1", "hgss4"]),
    ("64", &["base2", "sv6pt5"]),
    ("62", &["base3"]),
    ("130", &["base4", "dp1"]),
    ("82", &["base5"]),
    ("83", &["base5"]), // ひかるライチュウ込みの83枚版
    ("132", &["gym1", "dp3"]),
    ("129", &["gym2"]),
    ("75", &["neo2"]),
    ("66", &["neo3"]),
    ("165", &["sv3pt5", "ecard1"]),
    ("144", &["ecard3"]),
    // ハートゴールド＆ソウルシルバー期
    ("123", &["hgss1", "dp2"]),
    ("95", &["hgss2"]),
    ("90", &["hgss3"]),
    // ダイヤモンド＆パール期
    ("100", &["dp5"]),
    // その他の共有総数
    ("73", &["swsh3pt5", "sm3pt5"]),
    ("72", &["swsh4pt5"]),
    ("78", &["pgo"]),
    ("25", &["cel25"]),
    ("91", &["sv4pt5"]),
    ("98", &["xy7", "bw2"]),
    ("99", &["bw4", "pl4"]),
    ("101", &["bw3", "bw10"]),
    ("106", &["col1", "dp4", "dp7"]),
    ("108", &["xy6", "xy12", "bw5"]),
    ("109", &["xy2"]),
    ("110", &["base6"]),
    ("111", &["neo1", "xy3", "pl2"]),
    ("113", &["neo4"]),
    ("114", &["xy11", "bw1"]),
    ("122", &["xy9"]),
    ("124", &["sm4", "bw6"]),
    ("145", &["sm2"]),
    ("146", &["xy1", "dp6"]),
    ("147", &["sm3", "ecard2", "pl3"]),
    ("149", &["sm1", "bw7"]),
];

/// 旧WotC期のセット総数
///
/// モダンなセットコードが無くこれらの総数が出ていれば旧期とみなす。
pub static WOTC_SET_TOTALS: &[&str] = &[
    "102", "64", "62", "82", "83", "110", "132", "111", "75", "66", "113", "130",
];

/// 旧WotC期（Base〜eカード）のセットコード
pub static BASE_ERA_SETS: &[&str] = &[
    "base1", "base2", "base3", "base4", "base5", "base6", "gym1", "gym2", "neo1", "neo2", "neo3",
    "neo4", "ecard1", "ecard2", "ecard3",
];

/// WotC期を示すテキストパターン
///
/// 旧カード（1999〜2003年）の版権表記。OCRでの © の読み取りミスも拾う。
pub static WOTC_ERA_PATTERNS: &[&str] = &[
    "WIZARDS OF THE COAST",
    "WIZARDS",
    "WOTC",
    // "Wizards" のOCR誤読
    "WIZAROS",
    "W1ZARDS",
    "WlZARDS",
    "WTZARDS",
    "WI2ARDS",
    "WIZARD5",
    "WIZARO5",
    "W!ZARDS",
    "WIZBROS",
    "WIZAPDS",
    "WIZARDS.",
    // 版権年（© の読み取りバリエーション込み）
    "©1995", "©1996", "©1997", "©1998", "©1999",
    "©2000", "©2001", "©2002", "©2003",
    "C1995", "C1996", "C1997", "C1998", "C1999",
    "C2000", "C2001", "C2002", "C2003",
    "01995", "01996", "01997", "01998", "01999",
    "02000", "02001", "02002", "02003",
    "@1995", "@1996", "@1997", "@1998", "@1999",
    "@2000", "@2001", "@2002", "@2003",
    "(1995", "(1996", "(1997", "(1998", "(1999",
    "(2000", "(2001", "(2002", "(2003",
    "© 1995", "© 1996", "© 1997", "© 1998", "© 1999",
    "© 2000", "© 2001", "© 2002", "© 2003",
    // 旧カード共通の版権表記
    "NINTENDO",
    "CREATURES",
    "GAMEFREAK",
    "GAME FREAK",
];

/// フォールバック名簿
///
/// コーパス由来の動的名簿が未初期化のときに使う既知カード名。
/// 長い順の整列は NameResolver 構築時に行う。
pub static FALLBACK_CARD_NAMES: &[&str] = &[
    // 初代151匹（Base Set期）
    "bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon", "charizard",
    "squirtle", "wartortle", "blastoise", "caterpie", "metapod", "butterfree",
    "weedle", "kakuna", "beedrill", "pidgey", "pidgeotto", "pidgeot",
    "rattata", "raticate", "spearow", "fearow", "ekans", "arbok",
    "pikachu", "raichu", "sandshrew", "sandslash", "nidoran", "nidorina",
    "nidoqueen", "nidorino", "nidoking", "clefairy", "clefable", "vulpix",
    "ninetales", "jigglypuff", "wigglytuff", "zubat", "golbat", "oddish",
    "gloom", "vileplume", "paras", "parasect", "venonat", "venomoth",
    "diglett", "dugtrio", "meowth", "persian", "psyduck", "golduck",
    "mankey", "primeape", "growlithe", "arcanine", "poliwag", "poliwhirl",
    "poliwrath", "abra", "kadabra", "alakazam", "machop", "machoke",
    "machamp", "bellsprout", "weepinbell", "victreebel", "tentacool", "tentacruel",
    "geodude", "graveler", "golem", "ponyta", "rapidash", "slowpoke",
    "slowbro", "magnemite", "magneton", "farfetch'd", "doduo", "dodrio",
    "seel", "dewgong", "grimer", "muk", "shellder", "cloyster",
    "gastly", "haunter", "gengar", "onix", "drowzee", "hypno",
    "krabby", "kingler", "voltorb", "electrode", "exeggcute", "exeggutor",
    "cubone", "marowak", "hitmonlee", "hitmonchan", "lickitung", "koffing",
    "weezing", "rhyhorn", "rhydon", "chansey", "tangela", "kangaskhan",
    "horsea", "seadra", "goldeen", "seaking", "staryu", "starmie",
    "mr. mime", "scyther", "jynx", "electabuzz", "magmar", "pinsir",
    "tauros", "magikarp", "gyarados", "lapras", "ditto", "eevee",
    "vaporeon", "jolteon", "flareon", "porygon", "omanyte", "omastar",
    "kabuto", "kabutops", "aerodactyl", "snorlax", "articuno", "zapdos",
    "moltres", "dratini", "dragonair", "dragonite", "mewtwo", "mew",
    // 第2世代の主要どころ
    "chikorita", "cyndaquil", "totodile", "umbreon", "espeon", "lugia",
    "ho-oh", "celebi", "tyranitar", "scizor", "heracross",
    // 後世代の伝説・人気ポケモン
    "rayquaza", "arceus", "giratina", "dialga", "palkia",
    "jirachi", "deoxys", "darkrai", "shaymin", "lucario", "garchomp",
    "sylveon", "greninja", "zekrom", "reshiram",
    // 剣盾・SV期
    "zacian", "zamazenta", "eternatus", "urshifu", "calyrex",
    "miraidon", "koraidon", "chien-pao", "wo-chien", "ting-lu", "chi-yu",
    "iron valiant", "iron hands", "iron thorns", "roaring moon", "great tusk",
    "slither wing", "brute bonnet", "flutter mane", "sandy shocks",
    "lechonk", "smoliv", "fidough", "cetitan", "baxcalibur",
    "kingambit", "palafin", "tinkaton", "armarouge", "ceruledge",
    "gholdengo", "annihilape", "pawmot", "rabsca", "garganacl",
    "dondozo", "tatsugiri", "orthworm", "glimmora", "greavard",
    "houndstone", "revavroom", "cyclizar", "flamigo", "klawf",
    "lokix", "grafaiai", "squawkabilly", "nacli", "charcadet",
];

/// 転置インデックスのストップワード
///
/// カード文に頻出するが照合の手掛かりにならない語。
pub static INDEX_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "you", "your", "this", "that", "with", "from", "into", "each", "all",
    "any", "can", "may", "one", "two", "pokemon", "card", "cards", "energy", "damage", "attack",
    "turn",
];

/// レアリティ表記（長い・具体的なものから照合する）
pub static RARITY_PATTERNS: &[(&str, &str)] = &[
    ("ILLUSTRATION RARE", "Illustration Rare"),
    ("SPECIAL ART RARE", "Special Art Rare"),
    ("SECRET RARE", "Secret Rare"),
    ("DOUBLE RARE", "Double Rare"),
    ("HYPER RARE", "Hyper Rare"),
    ("ULTRA RARE", "Ultra Rare"),
    ("RARE HOLO", "Rare Holo"),
    ("UNCOMMON", "Uncommon"),
    ("COMMON", "Common"),
    ("PROMO", "Promo"),
    ("RARE", "Rare"), // "RARE" 系の中で最後に置くこと
];

/// フォイル確定パターン（0.9）
///
/// これらが出ていればフォイル。is_foil を直接立てる。
pub static FOIL_HIGH_CONFIDENCE: &[(&str, &str)] = &[
    ("HOLOFOIL", "Holofoil text detected"),
    ("REVERSE HOLO", "Reverse holo text detected"),
    ("HOLO RARE", "Holo rare text detected"),
];

/// フォイル示唆パターン（0.6）
///
/// フォイルであることが多いが確定ではない。確度と根拠だけ積み、
/// is_foil は立てない。
pub static FOIL_MEDIUM_CONFIDENCE: &[(&str, &str)] = &[
    ("RAINBOW", "Rainbow rare indicator"),
    ("GOLD", "Gold card indicator"),
    ("SECRET", "Secret rare indicator"),
    ("FULL ART", "Full art card"),
    ("SPECIAL ART", "Special art rare"),
    ("ILLUSTRATION", "Special illustration rare"),
    ("ALT ART", "Alternate art card"),
    ("ALTERNATE ART", "Alternate art card"),
    ("SHINY", "Shiny variant text"),
];

/// 鑑定ラベル・状態表記
pub static GRADING_PATTERNS: &[(&str, &str)] = &[
    ("PSA", "PSA graded card"),
    ("BGS", "Beckett graded card"),
    ("CGC", "CGC graded card"),
    ("SGC", "SGC graded card"),
    ("MINT", "Mint condition indicator"),
    ("NEAR MINT", "Near Mint condition"),
    ("NM", "Near Mint abbreviation"),
    ("GEM MINT", "Gem Mint condition"),
    ("PRISTINE", "Pristine condition"),
];

/// 状態劣化の表記
pub static CONDITION_ISSUE_PATTERNS: &[(&str, &str)] = &[
    ("DAMAGED", "Damaged condition"),
    ("PLAYED", "Played condition"),
    ("CREASED", "Card has crease"),
    ("SCRATCHED", "Card has scratches"),
    ("WORN", "Card shows wear"),
];

/// 名前候補から外す単語（完全一致）
///
/// 単独では名前になり得ないが、"Energy Switch" のように名前の一部には
/// なり得る語。行全体がこれらと一致するときだけ除外する。
pub static NAME_SKIP_EXACT: &[&str] = &[
    "basic", "stage", "pokemon", "trainer", "energy",
    "attack", "weakness", "resistance", "retreat", "rule",
    "prize", "discard", "damage", "opponent",
    // 英語のカード種別語（日本語カードでは唯一の英字行になることがある）
    "supporter",
    "item",
    "stadium",
    "tool",
    // 日本語のトレーナーズ種別
    "サポート",
    "グッズ",
    "スタジアム",
    "ポケモンのどうぐ",
    "たねポケモン",
    "進化ポケモン",
    "特性",
    "ワザ",
    // 日本語カード文の頻出語
    "このカード",
    "自分の",
    "相手の",
    "山札",
    "手札",
    "トラッシュ",
];

/// 名前候補から外すフレーズ（部分一致）
///
/// 行に含まれていれば説明文・ヘッダ行とみなす。
pub static NAME_SKIP_CONTAINS: &[&str] = &[
    "once during", "when you", "your turn",
    "evolves from", "knocked out",
    // OCRが名前行を取りこぼしたときに現れやすいヘッダ行
    "trainer -",
    "basic pokemon",
    "stage 1",
    "stage 2",
    "illus", "©", "nintendo",
];

/// 名前候補から外すレアリティ語（完全一致）
pub static NAME_SKIP_RARITY: &[&str] = &[
    "holo", "rare", "uncommon", "common", "promo",
    "gold", "rainbow", "secret", "full art", "reverse",
    "illustration", "special art", "ultra", "hyper", "double",
];

/// ジムリーダー・ロケット団等の所有プレフィックス（旧WotC期）
pub static GYM_LEADER_PREFIXES: &[&str] = &[
    "lt. surge's", "lt surge's", "sabrina's", "brock's", "misty's",
    "erika's", "koga's", "blaine's", "giovanni's",
    "dark", "light", "rocket's", "team rocket's",
];

/// 既知カード名のOCR誤読 → 正しい表記
pub static NAME_CORRECTIONS: &[(&str, &str)] = &[
    // Base Set期の定番誤読
    ("Charizarcl", "Charizard"),
    ("Charízard", "Charizard"),
    ("Char1zard", "Charizard"),
    ("Blasto1se", "Blastoise"),
    ("Blastoíse", "Blastoise"),
    ("P1kachu", "Pikachu"),
    ("Píkachu", "Pikachu"),
    ("Ra1chu", "Raichu"),
    ("N1netales", "Ninetales"),
    ("Alakazarn", "Alakazam"),
    ("A1akazam", "Alakazam"),
    ("Mewtw0", "Mewtwo"),
    ("Macharnp", "Machamp"),
    ("Macharno", "Machamp"),
    ("Gyarad0s", "Gyarados"),
    ("Gy arados", "Gyarados"), // 名前中に空白が入るパターン
    ("Dragon1te", "Dragonite"),
    ("Art1cuno", "Articuno"),
    ("Za pdos", "Zapdos"),
    ("Snorl ax", "Snorlax"),
    ("Genqar", "Gengar"),
    ("Drat1ni", "Dratini"),
    ("Dragon air", "Dragonair"),
    ("Electabuz z", "Electabuzz"),
    ("E1ectabuzz", "Electabuzz"),
    ("Magnern1te", "Magnemite"),
    ("Jig glypuff", "Jigglypuff"),
    ("Wiggly tuff", "Wigglytuff"),
    ("Butterfr ee", "Butterfree"),
    ("Caterp1e", "Caterpie"),
    ("Po1ywag", "Poliwag"),
    ("Po1iwrath", "Poliwrath"),
    ("Star m1e", "Starmie"),
    ("Hyp no", "Hypno"),
    ("Aero dactyl", "Aerodactyl"),
    ("Orn astar", "Omastar"),
    ("Kabu tops", "Kabutops"),
    // わるいポケモン（ロケット団）
    ("Dark Chari zard", "Dark Charizard"),
    ("Dark B1astoise", "Dark Blastoise"),
    ("Dark Dragon1te", "Dark Dragonite"),
    // ジムリーダーのポケモン
    ("Lt Surge's", "Lt. Surge's"),
    ("Sabr1na's", "Sabrina's"),
    ("Er1ka's", "Erika's"),
    ("G1ovanni's", "Giovanni's"),
    ("Bla1ne's", "Blaine's"),
    ("B1aine's", "Blaine's"),
];

/// ベース名抽出で除去するサフィックス（長いものから照合する）
pub static BASE_NAME_SUFFIXES: &[&str] = &[
    " vmax", " vstar", " v-union", " v",
    " gx", " ex", " mega", " prime",
    " lv.x", " lvx", " legend", " star",
    " δ", " delta", " radiant",
];

/// マジック系のセットコード誤検出になりやすい語
///
/// 3〜4文字の大文字列のうち、セットコードではなく英単語・カード用語・
/// アーティスト名として頻出するもの。"ONE" は実在セットのため含めない。
pub static MAGIC_CODE_FALSE_POSITIVES: &[&str] = &[
    // 頻出英単語
    "THE", "AND", "FOR", "YOU", "ARE", "WAS", "HAS", "HAD", "NOT", "ALL",
    "CAN", "HER", "HIS", "BUT", "ITS", "OUT", "GET", "HIM", "PUT", "END",
    "ADD", "TAP", "MAY", "TWO", "USE", "ANY", "OWN", "WAY", "NEW",
    // カード用語
    "FOIL", "BOLT", "RING", "VEIL", "SIX", "SOL", "ART", "DEAL", "CARD",
    "DRAW", "EACH", "FROM", "INTO", "ONTO", "THAT", "THIS", "WITH", "YOUR",
    // フォイル種別（セットコードとして扱わない）
    "ETCHED", "SURGE",
    // カード文の頻出語
    "THEN", "WHEN", "LIFE", "LOSE", "GAIN", "DIES", "TURN", "COPY", "COST",
    "MANA", "STEP", "NEXT", "MILL", "CAST", "PLAY",
    // セットコードに見えるアーティスト名の断片
    "RAHN", "JOHN", "MARK", "ADAM", "CARL", "ERIC", "GREG", "IVAN", "JACK",
    "KARL", "LARS", "MIKE", "NICK", "NOAH", "PAUL", "RYAN", "SEAN", "TODD",
    "TONY", "ZACK",
    // イラストレーター表記
    "ILLUS", "ILLU",
];

/// マジック系のフォイル変種表記
pub static MAGIC_FOIL_PATTERNS: &[&str] = &[
    "FOIL", "ETCHED", "SURGE", "SHOWCASE", "BORDERLESS", "EXTENDED ART",
];

/// マジック系の名前候補から外す語
pub static MAGIC_NAME_SKIP: &[&str] = &[
    "creature", "instant", "sorcery", "enchantment", "artifact",
    "legendary", "flying", "trample", "when", "©", "wizards",
];

lazy_static::lazy_static! {
    static ref STOP_WORD_SET: HashSet<&'static str> = INDEX_STOP_WORDS.iter().copied().collect();
    static ref LEGACY_CODE_MAP: std::collections::HashMap<&'static str, &'static str> =
        LEGACY_CODE_TO_SET.iter().copied().collect();
    static ref WOTC_TOTAL_SET: HashSet<&'static str> = WOTC_SET_TOTALS.iter().copied().collect();
    static ref BASE_ERA_SET: HashSet<&'static str> = BASE_ERA_SETS.iter().copied().collect();
    static ref MAGIC_FALSE_POSITIVE_SET: HashSet<&'static str> =
        MAGIC_CODE_FALSE_POSITIVES.iter().copied().collect();
}

/// ストップワードか
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// 旧2文字コードの対応セットを引く
pub fn legacy_code_lookup(code: &str) -> Option<&'static str> {
    LEGACY_CODE_MAP.get(code).copied()
}

/// セット総数の候補セット一覧を引く
pub fn candidates_for_total(total: &str) -> Option<&'static [&'static str]> {
    SET_TOTAL_TO_CANDIDATES
        .iter()
        .find(|(t, _)| *t == total)
        .map(|(_, sets)| *sets)
}

/// 旧WotC期の総数か
pub fn is_wotc_total(total: &str) -> bool {
    WOTC_TOTAL_SET.contains(total)
}

/// 旧WotC期のセットコードか
pub fn is_base_era_set(set_code: &str) -> bool {
    BASE_ERA_SET.contains(set_code)
}

/// マジック系セットコードの誤検出語か
pub fn is_magic_false_positive(code: &str) -> bool {
    MAGIC_FALSE_POSITIVE_SET.contains(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_for_total() {
        assert_eq!(candidates_for_total("185"), Some(&["swsh4"][..]));
        assert_eq!(candidates_for_total("198"), Some(&["sv1", "swsh6"][..]));
        assert_eq!(candidates_for_total("999"), None);
    }

    #[test]
    fn test_legacy_code_lookup() {
        assert_eq!(legacy_code_lookup("BS"), Some("base1"));
        assert_eq!(legacy_code_lookup("JU"), Some("base2"));
        // "EX" は現行 ex サフィックスと衝突するため未登録
        assert_eq!(legacy_code_lookup("EX"), None);
    }

    #[test]
    fn test_is_stop_word() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("pokemon"));
        assert!(!is_stop_word("charizard"));
    }

    #[test]
    fn test_magic_false_positives_keep_real_sets() {
        // "ONE"（ファイレクシア: 完全なる統一）は実在セット
        assert!(!is_magic_false_positive("ONE"));
        assert!(is_magic_false_positive("THE"));
    }

    #[test]
    fn test_set_name_table_has_no_bare_base() {
        assert!(SET_NAME_TO_CODE.iter().all(|(name, _)| *name != "BASE"));
        assert!(SET_NAME_TO_CODE.iter().all(|(name, _)| *name != "MEW"));
    }
}
