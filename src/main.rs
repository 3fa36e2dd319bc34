use anyhow::{bail, Context, Result};
use pdf_chat::utils::logging;
use pdf_chat::{AnswerResolver, Config, RequestLifecycleController, SubmitOutcome, UploadFile, UploadOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    let Some(path) = std::env::args().nth(1) else {
        bail!("用法: pdf_chat <file.pdf>");
    };

    let controller = RequestLifecycleController::from_config(&config);

    // 上传文档
    let file = UploadFile::from_path(&path).await?;
    let document = match controller.upload(&[file]).await.context("上传失败")? {
        UploadOutcome::Registered(registration) => registration.document,
        UploadOutcome::Ignored(reason) => bail!("上传被忽略: {:?}", reason),
    };
    println!(
        "PDF uploaded: {} ({}, {} pages)",
        document.name,
        document.display_size(),
        document.page_count
    );

    println!("Try asking:");
    for question in AnswerResolver::suggested_questions() {
        println!("  - {}", question);
    }

    // 逐行读取问题
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match controller.submit(&line).await {
            Ok(SubmitOutcome::Answered { answer, .. }) => println!("AI: {}", answer.content),
            Ok(SubmitOutcome::Failed { notice, .. }) => println!("System: {}", notice.content),
            Ok(SubmitOutcome::Ignored(_)) => {}
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}
